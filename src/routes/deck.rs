use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    auth::AuthUser,
    errors::ApiError,
    models::{Deck, DeckForm, Flashcard, FlashcardStats, SearchQuery},
    router::AppState,
    routes::{check_user_id, handle_render},
    templates,
};

pub(crate) async fn fetch_owned_deck(
    state: &AppState,
    deck_id: i32,
    user_id: i32,
) -> Result<Deck, ApiError> {
    sqlx::query_as::<_, Deck>("SELECT * FROM deck WHERE id = $1 AND user_id = $2")
        .bind(deck_id)
        .bind(user_id)
        .fetch_optional(&*state.db)
        .await?
        .ok_or(ApiError::UserNotFoundOrUnauthorized)
}

pub async fn list_decks(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let decks = sqlx::query_as::<_, Deck>("SELECT * FROM deck WHERE user_id = $1 ORDER BY id")
        .bind(user_id)
        .fetch_all(&*state.db)
        .await?;

    // Card statistics across all of the user's decks
    let stats = sqlx::query_as::<_, FlashcardStats>(
        r#"
        SELECT
            COUNT(CASE WHEN f.repetitions = 0 THEN 1 END) as new_count,
            COUNT(CASE WHEN f.next_review <= NOW() THEN 1 END) as due_count,
            COUNT(CASE WHEN f.next_review > NOW() THEN 1 END) as learning_count
        FROM flashcard f
        INNER JOIN deck d ON f.deck_id = d.id
        WHERE d.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(&*state.db)
    .await?;

    let streak_count =
        sqlx::query_scalar::<_, i32>("SELECT streak_count FROM streak WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&*state.db)
            .await?
            .unwrap_or(0);

    let template = templates::DecksTemplate {
        decks,
        stats,
        streak_count,
    };
    handle_render(template.render())
}

pub async fn create_deck(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<DeckForm>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let deck = sqlx::query_as::<_, Deck>(
        "INSERT INTO deck (title, description, user_id) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(form.title.trim())
    .bind(form.description.trim())
    .bind(user_id)
    .fetch_one(&*state.db)
    .await?;

    let template = templates::DeckRowTemplate { deck };
    handle_render(template.render())
}

pub async fn view_deck(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let deck = fetch_owned_deck(&state, id, user_id).await?;

    let flashcards =
        sqlx::query_as::<_, Flashcard>("SELECT * FROM flashcard WHERE deck_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(&*state.db)
            .await?;
    let due_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM flashcard WHERE deck_id = $1 AND next_review <= NOW()",
    )
    .bind(id)
    .fetch_one(&*state.db)
    .await?;

    let template = templates::DeckTemplate {
        deck,
        flashcards,
        due_count,
    };
    handle_render(template.render())
}

pub async fn update_deck(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<DeckForm>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let deck = sqlx::query_as::<_, Deck>(
        "UPDATE deck SET title = $1, description = $2 WHERE id = $3 AND user_id = $4 RETURNING *",
    )
    .bind(form.title.trim())
    .bind(form.description.trim())
    .bind(id)
    .bind(user_id)
    .fetch_optional(&*state.db)
    .await?
    .ok_or(ApiError::UserNotFoundOrUnauthorized)?;

    let template = templates::DeckRowTemplate { deck };
    handle_render(template.render())
}

pub async fn delete_deck(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    // Flashcards and progress rows go with the deck.
    sqlx::query("DELETE FROM deck WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&*state.db)
        .await?;

    Ok(StatusCode::OK)
}

pub async fn search(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let query = query.query.filter(|q| !q.trim().is_empty());

    let (decks, flashcards) = match &query {
        Some(q) => {
            let pattern = format!("%{}%", q.trim());
            let decks = sqlx::query_as::<_, Deck>(
                r#"
                SELECT * FROM deck
                WHERE user_id = $1 AND (title ILIKE $2 OR description ILIKE $2)
                ORDER BY id
                "#,
            )
            .bind(user_id)
            .bind(&pattern)
            .fetch_all(&*state.db)
            .await?;
            let flashcards = sqlx::query_as::<_, Flashcard>(
                r#"
                SELECT f.* FROM flashcard f
                INNER JOIN deck d ON f.deck_id = d.id
                WHERE d.user_id = $1 AND (f.question ILIKE $2 OR f.answer ILIKE $2)
                ORDER BY f.id
                "#,
            )
            .bind(user_id)
            .bind(&pattern)
            .fetch_all(&*state.db)
            .await?;
            (decks, flashcards)
        }
        None => (Vec::new(), Vec::new()),
    };

    let template = templates::SearchTemplate {
        query,
        decks,
        flashcards,
    };
    handle_render(template.render())
}
