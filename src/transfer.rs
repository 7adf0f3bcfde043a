//! Deck import and export formats.
//!
//! Two interchange formats: JSON (`{title, description, flashcards}`) and
//! CSV (`Question,Answer` header, one row per card). Scheduling state is
//! deliberately not part of either format; imported cards start fresh.
//! Parsing is pure; `import_deck` writes the whole deck in one transaction
//! so a malformed file never leaves a partial deck behind.
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid JSON deck: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV deck: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV file must start with a Question,Answer header row")]
    MissingHeader,
    #[error("CSV record {0} has no answer column")]
    ShortRecord(u64),
    #[error("deck title must not be empty")]
    EmptyTitle,
    #[error("unsupported file type, expected a .{0} file")]
    WrongExtension(&'static str),
    #[error("upload did not include a file")]
    MissingFile,
    #[error("invalid upload: {0}")]
    Upload(String),
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DeckExport {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub flashcards: Vec<CardExport>,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CardExport {
    pub question: String,
    pub answer: String,
}

pub fn parse_json_deck(data: &str) -> Result<DeckExport, TransferError> {
    let deck: DeckExport = serde_json::from_str(data)?;
    if deck.title.trim().is_empty() {
        return Err(TransferError::EmptyTitle);
    }
    Ok(deck)
}

pub fn render_json(deck: &DeckExport) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(deck)?)
}

pub fn parse_csv_cards(data: &str) -> Result<Vec<CardExport>, TransferError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = reader.headers()?;
    let header_ok = headers.len() >= 2
        && headers[0].trim().eq_ignore_ascii_case("question")
        && headers[1].trim().eq_ignore_ascii_case("answer");
    if !header_ok {
        return Err(TransferError::MissingHeader);
    }

    let mut cards = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() < 2 {
            return Err(TransferError::ShortRecord(i as u64 + 1));
        }
        cards.push(CardExport {
            question: record[0].to_string(),
            answer: record[1].to_string(),
        });
    }
    Ok(cards)
}

pub fn render_csv(cards: &[CardExport]) -> Result<String, TransferError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Question", "Answer"])?;
    for card in cards {
        writer.write_record([&card.question, &card.answer])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Creates the deck and all of its cards for `user_id`, all-or-nothing,
/// and leaves the user a notification about the new deck.
pub async fn import_deck(
    pool: &PgPool,
    user_id: i32,
    deck: &DeckExport,
) -> Result<i32, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let deck_id: i32 = sqlx::query_scalar(
        "INSERT INTO deck (title, description, user_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&deck.title)
    .bind(&deck.description)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    for card in &deck.flashcards {
        sqlx::query("INSERT INTO flashcard (deck_id, question, answer) VALUES ($1, $2, $3)")
            .bind(deck_id)
            .bind(&card.question)
            .bind(&card.answer)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("INSERT INTO notification (user_id, message) VALUES ($1, $2)")
        .bind(user_id)
        .bind(format!(
            "Imported deck \"{}\" with {} cards",
            deck.title,
            deck.flashcards.len()
        ))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(deck_id)
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_deck() -> DeckExport {
        DeckExport {
            title: "Cantonese".to_string(),
            description: "Phrases".to_string(),
            flashcards: vec![
                CardExport {
                    question: "Come on!".to_string(),
                    answer: "lei4 laa1.".to_string(),
                },
                CardExport {
                    question: "He dances, \"well\"".to_string(),
                    answer: "keoi5 tiu3 mou5.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn json_round_trip_preserves_every_field() {
        let deck = sample_deck();
        let rendered = render_json(&deck).unwrap();
        assert_eq!(parse_json_deck(&rendered).unwrap(), deck);
    }

    #[test]
    fn json_description_is_optional() {
        let deck =
            parse_json_deck(r#"{"title": "Math", "flashcards": [{"question": "2+2?", "answer": "4"}]}"#)
                .unwrap();
        assert_eq!(deck.description, "");
        assert_eq!(deck.flashcards.len(), 1);
    }

    #[test]
    fn json_without_a_title_is_rejected() {
        assert!(matches!(
            parse_json_deck(r#"{"title": "  ", "flashcards": []}"#),
            Err(TransferError::EmptyTitle)
        ));
        assert!(matches!(
            parse_json_deck(r#"{"flashcards": []}"#),
            Err(TransferError::Json(_))
        ));
    }

    #[test]
    fn truncated_json_is_rejected() {
        assert!(matches!(
            parse_json_deck(r#"{"title": "Math", "flashcards": ["#),
            Err(TransferError::Json(_))
        ));
    }

    #[test]
    fn csv_round_trip_preserves_cards() {
        let deck = sample_deck();
        let rendered = render_csv(&deck.flashcards).unwrap();
        assert_eq!(parse_csv_cards(&rendered).unwrap(), deck.flashcards);
    }

    #[test]
    fn csv_quoting_survives_commas_and_quotes() {
        let cards = vec![CardExport {
            question: "What does \"1,000\" mean?".to_string(),
            answer: "one thousand".to_string(),
        }];
        let rendered = render_csv(&cards).unwrap();
        assert_eq!(parse_csv_cards(&rendered).unwrap(), cards);
    }

    #[test]
    fn csv_without_the_header_is_rejected() {
        assert!(matches!(
            parse_csv_cards("2+2?,4\n3+3?,6\n"),
            Err(TransferError::MissingHeader)
        ));
    }

    #[test]
    fn csv_row_missing_the_answer_is_rejected() {
        let result = parse_csv_cards("Question,Answer\n2+2?\n");
        assert!(matches!(result, Err(TransferError::ShortRecord(1))));
    }

    #[test]
    fn csv_blank_lines_are_skipped() {
        let cards = parse_csv_cards("Question,Answer\n2+2?,4\n\n3+3?,6\n").unwrap();
        assert_eq!(cards.len(), 2);
    }
}
