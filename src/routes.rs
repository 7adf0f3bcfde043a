pub(crate) mod deck;
pub(crate) mod flashcard;
pub(crate) mod review;
pub(crate) mod stats;
pub(crate) mod transfer;
pub(crate) mod user;

use askama::Template;
use axum::{
    Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

pub use deck::{create_deck, delete_deck, list_decks, search, update_deck, view_deck};
pub use flashcard::{create_flashcard, delete_flashcard, get_flashcard, update_flashcard};
pub use review::{review_page, submit_review};
pub use stats::{leaderboard, mark_notification_read, notifications, progress};
pub use transfer::{
    export_deck_csv, export_deck_json, import_deck_csv, import_deck_json, show_import_form,
};
pub use user::{login, logout, register, show_login, show_register};

use crate::{auth::AuthUser, errors::ApiError, templates};

pub(crate) fn handle_render(res: askama::Result<String>) -> Result<Html<String>, ApiError> {
    match res {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            error!("Template rendering failed: {}", e);
            Err(ApiError::TemplateError(e))
        }
    }
}

pub(crate) fn check_user_id(user_id: Option<i32>) -> Result<i32, ApiError> {
    user_id.ok_or(ApiError::UserNotFoundOrUnauthorized)
}

pub async fn home(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let template = templates::IndexTemplate {
        is_authenticated: user_id.is_some(),
    };
    handle_render(template.render())
}

pub async fn styles() -> Result<impl IntoResponse, ApiError> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/css")
        .body(include_str!("../templates/styles.css").to_owned())?;

    Ok(response)
}

pub async fn not_found() -> Result<impl IntoResponse, ApiError> {
    let html = handle_render(templates::NotFoundTemplate.render())?;
    Ok((StatusCode::NOT_FOUND, html))
}
