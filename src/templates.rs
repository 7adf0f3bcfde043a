use askama::Template;

use crate::models;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub is_authenticated: bool,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "decks.html")]
pub struct DecksTemplate {
    pub decks: Vec<models::Deck>,
    pub stats: models::FlashcardStats,
    pub streak_count: i32,
}

/// Single deck list entry, rendered on its own for htmx swaps.
#[derive(Template)]
#[template(path = "deck_row.html")]
pub struct DeckRowTemplate {
    pub deck: models::Deck,
}

#[derive(Template)]
#[template(path = "deck.html")]
pub struct DeckTemplate {
    pub deck: models::Deck,
    pub flashcards: Vec<models::Flashcard>,
    pub due_count: i64,
}

/// Single card entry, rendered on its own for htmx swaps.
#[derive(Template)]
#[template(path = "flashcard.html")]
pub struct FlashcardTemplate {
    pub flashcard: models::Flashcard,
}

#[derive(Template)]
#[template(path = "review.html")]
pub struct ReviewTemplate {
    pub deck: models::Deck,
    pub flashcard: models::Flashcard,
    pub remaining: i64,
}

#[derive(Template)]
#[template(path = "review_done.html")]
pub struct ReviewDoneTemplate {
    pub deck: models::Deck,
}

#[derive(Template)]
#[template(path = "leaderboard.html")]
pub struct LeaderboardTemplate {
    pub top_users: Vec<models::LeaderboardRow>,
}

#[derive(Template)]
#[template(path = "progress.html")]
pub struct ProgressTemplate {
    pub rows: Vec<models::ProgressRow>,
}

#[derive(Template)]
#[template(path = "notifications.html")]
pub struct NotificationsTemplate {
    pub notifications: Vec<models::Notification>,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub query: Option<String>,
    pub decks: Vec<models::Deck>,
    pub flashcards: Vec<models::Flashcard>,
}

#[derive(Template)]
#[template(path = "import.html")]
pub struct ImportTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate;
