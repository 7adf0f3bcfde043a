use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(sqlx::FromRow, Serialize, Deserialize)]
pub struct Deck {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub user_id: i32,
}

#[derive(sqlx::FromRow, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i32,
    pub deck_id: i32,
    pub question: String,
    pub answer: String,
    pub difficulty: i32,
    pub ease_factor: f64,
    pub repetitions: i32,
    pub interval_days: i32,
    pub next_review: NaiveDateTime,
}

#[derive(sqlx::FromRow, Serialize, Deserialize)]
pub struct Streak {
    pub id: i32,
    pub user_id: i32,
    pub last_studied: NaiveDate,
    pub streak_count: i32,
}

/// Leaderboard read model: score joined with the scorer's name.
#[derive(sqlx::FromRow, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub username: String,
    pub score: i32,
}

/// One day of review activity in one deck.
#[derive(sqlx::FromRow, Serialize, Deserialize)]
pub struct ProgressRow {
    pub deck_title: String,
    pub date: NaiveDate,
    pub cards_reviewed: i32,
}

#[derive(sqlx::FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

/// Card counts shown on the deck overview.
#[derive(sqlx::FromRow, Serialize, Deserialize)]
pub struct FlashcardStats {
    pub new_count: i64,
    pub due_count: i64,
    pub learning_count: i64,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct DeckForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct FlashcardForm {
    pub question: String,
    pub answer: String,
}

#[derive(Deserialize)]
pub struct ReviewForm {
    pub flashcard_id: i32,
    pub difficulty: i32,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}
