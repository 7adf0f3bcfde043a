//! The review flow: serve the next due card, apply a rating, and persist
//! the scheduling update together with the per-user aggregates.
use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDateTime, Utc};
use tracing::debug;

use crate::{
    auth::AuthUser,
    errors::ApiError,
    models::{Flashcard, ReviewForm},
    router::AppState,
    routes::{check_user_id, deck::fetch_owned_deck, handle_render},
    srs::{self, CardState},
    streak::{self, StreakState},
    templates,
};

async fn next_due_card(
    state: &AppState,
    deck_id: i32,
    now: NaiveDateTime,
) -> Result<(Option<Flashcard>, i64), ApiError> {
    let flashcard = sqlx::query_as::<_, Flashcard>(
        r#"
        SELECT * FROM flashcard
        WHERE deck_id = $1 AND next_review <= $2
        ORDER BY next_review, id
        LIMIT 1
        "#,
    )
    .bind(deck_id)
    .bind(now)
    .fetch_optional(&*state.db)
    .await?;

    let due_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM flashcard WHERE deck_id = $1 AND next_review <= $2",
    )
    .bind(deck_id)
    .bind(now)
    .fetch_one(&*state.db)
    .await?;

    Ok((flashcard, due_count))
}

pub async fn review_page(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let deck = fetch_owned_deck(&state, deck_id, user_id).await?;

    let now = Utc::now().naive_utc();
    match next_due_card(&state, deck_id, now).await? {
        (Some(flashcard), due_count) => {
            let template = templates::ReviewTemplate {
                deck,
                flashcard,
                remaining: due_count,
            };
            handle_render(template.render())
        }
        (None, _) => handle_render(templates::ReviewDoneTemplate { deck }.render()),
    }
}

pub async fn submit_review(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<i32>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, ApiError> {
    let user_id = check_user_id(user_id)?;

    let card = sqlx::query_as::<_, Flashcard>(
        r#"
        SELECT f.* FROM flashcard f
        INNER JOIN deck d ON f.deck_id = d.id
        WHERE f.id = $1 AND f.deck_id = $2 AND d.user_id = $3
        "#,
    )
    .bind(form.flashcard_id)
    .bind(deck_id)
    .bind(user_id)
    .fetch_optional(&*state.db)
    .await?
    .ok_or(ApiError::UserNotFoundOrUnauthorized)?;

    // Rating validation happens before anything is written; an invalid
    // rating is a 422 and the card stays as it was.
    let now = Utc::now().naive_utc();
    let next = srs::apply_review(&CardState::from(&card), form.difficulty, now)?;
    debug!(
        "Card {} rated {}: interval {} -> {} days",
        card.id, form.difficulty, card.interval_days, next.interval_days
    );

    persist_review(&state, user_id, &card, &next, now).await?;

    Ok(Redirect::to(&format!("/decks/{deck_id}/review")).into_response())
}

/// Commits one review: the card's new scheduling state, the leaderboard
/// point, the streak advance, and the daily progress counter, atomically.
async fn persist_review(
    state: &AppState,
    user_id: i32,
    card: &Flashcard,
    next: &CardState,
    now: NaiveDateTime,
) -> Result<(), ApiError> {
    let today = now.date();
    let mut tx = state.db.begin().await?;

    sqlx::query(
        r#"
        UPDATE flashcard
        SET difficulty = $1,
            ease_factor = $2,
            repetitions = $3,
            interval_days = $4,
            next_review = $5
        WHERE id = $6
        "#,
    )
    .bind(next.difficulty)
    .bind(next.ease_factor)
    .bind(next.repetitions)
    .bind(next.interval_days)
    .bind(next.next_review)
    .bind(card.id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO leaderboard (user_id, score) VALUES ($1, 1)
        ON CONFLICT (user_id) DO UPDATE SET score = leaderboard.score + 1
        "#,
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let current = sqlx::query_as::<_, crate::models::Streak>(
        "SELECT * FROM streak WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;
    let advanced = streak::record_study_event(
        &current.as_ref().map(StreakState::from).unwrap_or_default(),
        today,
    );
    if let Some(last_studied) = advanced.last_studied {
        sqlx::query(
            r#"
            INSERT INTO streak (user_id, last_studied, streak_count) VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET last_studied = EXCLUDED.last_studied, streak_count = EXCLUDED.streak_count
            "#,
        )
        .bind(user_id)
        .bind(last_studied)
        .bind(advanced.streak_count)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO progress (user_id, deck_id, date, cards_reviewed) VALUES ($1, $2, $3, 1)
        ON CONFLICT (user_id, deck_id, date) DO UPDATE
        SET cards_reviewed = progress.cards_reviewed + 1
        "#,
    )
    .bind(user_id)
    .bind(card.deck_id)
    .bind(today)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
