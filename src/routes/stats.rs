//! Leaderboard, progress history, and the notification feed.
use std::sync::Arc;

use askama::Template;
use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::{
    auth::AuthUser,
    errors::ApiError,
    models::{LeaderboardRow, Notification, ProgressRow},
    router::AppState,
    routes::{check_user_id, handle_render},
    templates,
};

const LEADERBOARD_SIZE: i64 = 10;

/// Public page: top scorers, ties broken by who got on the board first.
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let top_users = sqlx::query_as::<_, LeaderboardRow>(
        r#"
        SELECT u.username, l.score FROM leaderboard l
        INNER JOIN users u ON u.id = l.user_id
        ORDER BY l.score DESC, l.id
        LIMIT $1
        "#,
    )
    .bind(LEADERBOARD_SIZE)
    .fetch_all(&*state.db)
    .await?;

    handle_render(templates::LeaderboardTemplate { top_users }.render())
}

pub async fn progress(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let rows = sqlx::query_as::<_, ProgressRow>(
        r#"
        SELECT d.title AS deck_title, p.date, p.cards_reviewed FROM progress p
        INNER JOIN deck d ON d.id = p.deck_id
        WHERE p.user_id = $1
        ORDER BY p.date DESC, d.title
        "#,
    )
    .bind(user_id)
    .fetch_all(&*state.db)
    .await?;

    handle_render(templates::ProgressTemplate { rows }.render())
}

pub async fn notifications(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notification WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(&*state.db)
    .await?;

    handle_render(templates::NotificationsTemplate { notifications }.render())
}

pub async fn mark_notification_read(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = check_user_id(user_id)?;
    let result = sqlx::query("UPDATE notification SET is_read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&*state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(Redirect::to("/notifications"))
}
