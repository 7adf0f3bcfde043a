//! Spaced-repetition scheduling.
//!
//! The scheduler is a pure function over a card's scheduling state: the
//! caller loads the state, applies a review, and persists the result.
//! Handlers own the transaction; nothing in here touches the database.
use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;

use crate::models::Flashcard;

/// Lowest rating that still counts as a successful review.
pub const PASSING_DIFFICULTY: i32 = 2;

/// Floor for the ease factor; below this intervals stop shrinking.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor assigned to freshly created cards.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SrsError {
    #[error("difficulty rating must be between 1 and 3, got {0}")]
    InvalidRating(i32),
}

/// The mutable scheduling fields of a flashcard.
#[derive(Debug, Clone, PartialEq)]
pub struct CardState {
    pub difficulty: i32,
    pub ease_factor: f64,
    pub repetitions: i32,
    pub interval_days: i32,
    pub next_review: NaiveDateTime,
}

impl From<&Flashcard> for CardState {
    fn from(card: &Flashcard) -> Self {
        Self {
            difficulty: card.difficulty,
            ease_factor: card.ease_factor,
            repetitions: card.repetitions,
            interval_days: card.interval_days,
            next_review: card.next_review,
        }
    }
}

/// Applies a single review outcome to a card's scheduling state.
///
/// `difficulty` is the user's rating: 1 = failed, 2 = acceptable, 3 = easy.
/// The ease factor is updated for every rating, including failing ones, so
/// it always reflects the latest signal. A failing review resets the
/// repetition streak and schedules the card for tomorrow; a successful one
/// walks the 1-day / 6-day / `interval * ease` ladder.
///
/// Returns `SrsError::InvalidRating` for ratings outside 1..=3. The input
/// state is never modified.
pub fn apply_review(
    state: &CardState,
    difficulty: i32,
    now: NaiveDateTime,
) -> Result<CardState, SrsError> {
    if !(1..=3).contains(&difficulty) {
        return Err(SrsError::InvalidRating(difficulty));
    }

    let miss = f64::from(3 - difficulty);
    let ease_factor = (state.ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR);

    let (repetitions, interval_days) = if difficulty >= PASSING_DIFFICULTY {
        let repetitions = state.repetitions + 1;
        let interval_days = match repetitions {
            1 => 1,
            2 => 6,
            _ => (f64::from(state.interval_days) * ease_factor).floor() as i32,
        };
        (repetitions, interval_days)
    } else {
        (0, 1)
    };

    Ok(CardState {
        difficulty,
        ease_factor,
        repetitions,
        interval_days,
        next_review: now + TimeDelta::days(i64::from(interval_days)),
    })
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn fresh_card() -> CardState {
        CardState {
            difficulty: 1,
            ease_factor: INITIAL_EASE_FACTOR,
            repetitions: 0,
            interval_days: 1,
            next_review: now(),
        }
    }

    #[test]
    fn rejects_out_of_range_ratings() {
        let card = fresh_card();
        assert_eq!(
            apply_review(&card, 0, now()),
            Err(SrsError::InvalidRating(0))
        );
        assert_eq!(
            apply_review(&card, 4, now()),
            Err(SrsError::InvalidRating(4))
        );
        // input untouched
        assert_eq!(card, fresh_card());
    }

    #[test]
    fn easy_reviews_walk_the_interval_ladder() {
        let first = apply_review(&fresh_card(), 3, now()).unwrap();
        assert_eq!(first.repetitions, 1);
        assert_eq!(first.interval_days, 1);
        assert!((first.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(first.next_review, now() + TimeDelta::days(1));

        let second = apply_review(&first, 3, now()).unwrap();
        assert_eq!(second.repetitions, 2);
        assert_eq!(second.interval_days, 6);

        let third = apply_review(&second, 3, now()).unwrap();
        assert_eq!(third.repetitions, 3);
        assert_eq!(
            third.interval_days,
            (6.0 * third.ease_factor).floor() as i32
        );
        assert_eq!(
            third.next_review,
            now() + TimeDelta::days(i64::from(third.interval_days))
        );
    }

    #[test]
    fn failed_review_resets_regardless_of_history() {
        let mut card = fresh_card();
        for _ in 0..5 {
            card = apply_review(&card, 3, now()).unwrap();
        }
        assert!(card.repetitions >= 3);

        let failed = apply_review(&card, 1, now()).unwrap();
        assert_eq!(failed.repetitions, 0);
        assert_eq!(failed.interval_days, 1);
        assert_eq!(failed.next_review, now() + TimeDelta::days(1));
    }

    #[test]
    fn failed_review_still_updates_ease_factor() {
        let card = fresh_card();
        let failed = apply_review(&card, 1, now()).unwrap();
        // 2.5 + (0.1 - 2 * (0.08 + 2 * 0.02)) = 2.36
        assert!((failed.ease_factor - 2.36).abs() < 1e-9);
    }

    #[test]
    fn ease_factor_never_drops_below_floor() {
        let mut card = fresh_card();
        for _ in 0..20 {
            card = apply_review(&card, 1, now()).unwrap();
            assert!(card.ease_factor >= MIN_EASE_FACTOR);
        }
        assert_eq!(card.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn interval_is_always_at_least_one_day() {
        let mut card = fresh_card();
        card.ease_factor = MIN_EASE_FACTOR;
        for difficulty in 1..=3 {
            let next = apply_review(&card, difficulty, now()).unwrap();
            assert!(next.interval_days >= 1);
        }
    }

    #[test]
    fn acceptable_rating_advances_but_keeps_ease_factor() {
        let card = fresh_card();
        let next = apply_review(&card, 2, now()).unwrap();
        assert_eq!(next.repetitions, 1);
        // 2.5 + (0.1 - 1 * (0.08 + 1 * 0.02)) = 2.5
        assert!((next.ease_factor - 2.5).abs() < 1e-9);
    }

    #[test]
    fn records_last_seen_difficulty() {
        let card = fresh_card();
        let next = apply_review(&card, 2, now()).unwrap();
        assert_eq!(next.difficulty, 2);
    }
}
