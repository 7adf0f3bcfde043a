use std::sync::Arc;

use axum::{
    Extension, Router, middleware,
    routing::{get, post},
};
use sqlx::PgPool;

use crate::{auth, config::AppConfig, routes};

pub struct AppState {
    pub db: Arc<PgPool>,
}

pub fn init_router(db: PgPool, config: AppConfig) -> Router {
    let state = Arc::new(AppState { db: Arc::new(db) });
    Router::new()
        .route("/", get(routes::home))
        .route("/styles.css", get(routes::styles))
        .route(
            "/register",
            get(routes::show_register).post(routes::register),
        )
        .route("/login", get(routes::show_login).post(routes::login))
        .route("/logout", get(routes::logout))
        .route("/search", get(routes::search))
        .route("/decks", get(routes::list_decks).post(routes::create_deck))
        .route(
            "/decks/{id}",
            get(routes::view_deck)
                .put(routes::update_deck)
                .delete(routes::delete_deck),
        )
        .route(
            "/decks/{id}/review",
            get(routes::review_page).post(routes::submit_review),
        )
        .route(
            "/decks/{deck_id}/flashcards",
            post(routes::create_flashcard),
        )
        .route(
            "/flashcards/{id}",
            get(routes::get_flashcard)
                .put(routes::update_flashcard)
                .delete(routes::delete_flashcard),
        )
        .route("/decks/{id}/export/json", get(routes::export_deck_json))
        .route("/decks/{id}/export/csv", get(routes::export_deck_csv))
        .route("/decks/import", get(routes::show_import_form))
        .route("/decks/import/json", post(routes::import_deck_json))
        .route("/decks/import/csv", post(routes::import_deck_csv))
        .route("/leaderboard", get(routes::leaderboard))
        .route("/progress", get(routes::progress))
        .route("/notifications", get(routes::notifications))
        .route(
            "/notifications/{id}/read",
            post(routes::mark_notification_read),
        )
        .fallback(routes::not_found)
        .layer(middleware::from_fn(auth::auth_middleware))
        .with_state(state)
        .layer(Extension(config))
}
