//! Consecutive-day study streak tracking.
//!
//! Works on calendar dates rather than timestamps so several reviews on the
//! same day count once. Pure like the scheduler; the review route persists
//! the result inside its transaction.
use chrono::NaiveDate;

use crate::models::Streak;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakState {
    pub last_studied: Option<NaiveDate>,
    pub streak_count: i32,
}

impl From<&Streak> for StreakState {
    fn from(row: &Streak) -> Self {
        Self {
            last_studied: Some(row.last_studied),
            streak_count: row.streak_count,
        }
    }
}

/// Advances the streak for a study event on `today`.
///
/// The very first study event starts the streak at 1. Repeat events on the
/// same day are no-ops, the day after the last study extends the streak,
/// and any longer gap restarts it at 1. A `today` earlier than
/// `last_studied` leaves the state unchanged: a clock moving backwards must
/// not wipe out a streak.
pub fn record_study_event(state: &StreakState, today: NaiveDate) -> StreakState {
    let streak_count = match state.last_studied {
        None => 1,
        Some(last) if today <= last => return *state,
        Some(last) if (today - last).num_days() == 1 => state.streak_count + 1,
        Some(_) => 1,
    };
    StreakState {
        last_studied: Some(today),
        streak_count,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn first_ever_study_starts_at_one() {
        let state = record_study_event(&StreakState::default(), day(1));
        assert_eq!(state.streak_count, 1);
        assert_eq!(state.last_studied, Some(day(1)));
    }

    #[test]
    fn same_day_reviews_do_not_inflate_the_streak() {
        let state = record_study_event(&StreakState::default(), day(1));
        let again = record_study_event(&state, day(1));
        assert_eq!(again, state);
    }

    #[test]
    fn consecutive_days_increment() {
        let mut state = record_study_event(&StreakState::default(), day(1));
        state = record_study_event(&state, day(2));
        state = record_study_event(&state, day(3));
        assert_eq!(state.streak_count, 3);
        assert_eq!(state.last_studied, Some(day(3)));
    }

    #[test]
    fn a_gap_resets_to_one() {
        let mut state = record_study_event(&StreakState::default(), day(1));
        state = record_study_event(&state, day(2));
        state = record_study_event(&state, day(5));
        assert_eq!(state.streak_count, 1);
        assert_eq!(state.last_studied, Some(day(5)));
    }

    #[test]
    fn an_earlier_date_is_ignored() {
        let state = record_study_event(&StreakState::default(), day(10));
        let skewed = record_study_event(&state, day(8));
        assert_eq!(skewed, state);
    }
}
