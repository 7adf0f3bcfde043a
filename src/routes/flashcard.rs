use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    auth::AuthUser,
    errors::ApiError,
    models::{Flashcard, FlashcardForm},
    router::AppState,
    routes::{check_user_id, deck::fetch_owned_deck, handle_render},
    templates::FlashcardTemplate,
};

pub async fn create_flashcard(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<i32>,
    Form(form): Form<FlashcardForm>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    fetch_owned_deck(&state, deck_id, user_id).await?;

    // Scheduling columns take their defaults: due immediately, interval 1,
    // ease factor 2.5, no repetitions.
    let flashcard = sqlx::query_as::<_, Flashcard>(
        "INSERT INTO flashcard (deck_id, question, answer) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(deck_id)
    .bind(&form.question)
    .bind(&form.answer)
    .fetch_one(&*state.db)
    .await?;

    let template = FlashcardTemplate { flashcard };
    handle_render(template.render())
}

pub async fn get_flashcard(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;

    let flashcard = sqlx::query_as::<_, Flashcard>(
        r#"
        SELECT * FROM flashcard
        WHERE id = $1 AND deck_id IN (
            SELECT id FROM deck WHERE user_id = $2
        )
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&*state.db)
    .await?
    .ok_or(ApiError::UserNotFoundOrUnauthorized)?;

    let template = FlashcardTemplate { flashcard };
    handle_render(template.render())
}

/// Edits question/answer content only; scheduling state is owned by the
/// review flow.
pub async fn update_flashcard(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<FlashcardForm>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;

    let flashcard = sqlx::query_as::<_, Flashcard>(
        r#"
        UPDATE flashcard
        SET question = $1, answer = $2
        WHERE id = $3 AND deck_id IN (
            SELECT id FROM deck WHERE user_id = $4
        )
        RETURNING *
        "#,
    )
    .bind(&form.question)
    .bind(&form.answer)
    .bind(id)
    .bind(user_id)
    .fetch_optional(&*state.db)
    .await?;

    match flashcard {
        Some(flashcard) => {
            let template = FlashcardTemplate { flashcard };
            handle_render(template.render())
        }
        None => Err(ApiError::UserNotFoundOrUnauthorized),
    }
}

pub async fn delete_flashcard(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;

    let result = sqlx::query(
        r#"
        DELETE FROM flashcard
        WHERE id = $1 AND deck_id IN (
            SELECT id FROM deck WHERE user_id = $2
        )
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&*state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::UserNotFoundOrUnauthorized);
    }

    Ok(StatusCode::OK)
}
