//! Per-user play statistics and the once-per-day update rule.

use crate::daily::calendar_day;
use crate::debug_log;
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Days between two recorded games that still continue a streak.
pub const STREAK_GRACE_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub played_games: u32,
    pub won_games: u32,
    pub current_streak: u32,
    /// `None` until the first recorded game.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Where a user stands for the calendar day containing `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    NotYetPlayedToday,
    AlreadyPlayedToday,
}

impl UserStats {
    #[must_use]
    pub fn day_state(&self, now: DateTime<Utc>, zone: FixedOffset) -> DayState {
        match self.last_updated {
            // A `now` before the last recorded day counts as played, so the
            // last update can never be moved back onto an earlier day.
            Some(last) if calendar_day(last, zone) >= calendar_day(now, zone) => {
                DayState::AlreadyPlayedToday
            }
            _ => DayState::NotYetPlayedToday,
        }
    }

    /// Share of played games that were won, in `[0, 1]`.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.played_games == 0 {
            0.0
        } else {
            f64::from(self.won_games) / f64::from(self.played_games)
        }
    }
}

/// Compute the stats after recording one finished game at `now`.
///
/// A gap of more than `STREAK_GRACE_DAYS` calendar days since the last
/// recorded game resets the streak to zero; anything shorter extends it.
///
/// # Errors
///
/// Returns `Error::AlreadyUpdated` when a game was already recorded on the
/// same or a later calendar day. `stats` is never modified.
pub fn record_result(
    stats: &UserStats,
    won: bool,
    now: DateTime<Utc>,
    zone: FixedOffset,
) -> Result<UserStats> {
    if stats.day_state(now, zone) == DayState::AlreadyPlayedToday {
        return Err(Error::AlreadyUpdated);
    }

    let current_streak = match stats.last_updated {
        Some(last) => {
            let diff_days = (calendar_day(now, zone) - calendar_day(last, zone)).num_days();
            if diff_days > STREAK_GRACE_DAYS {
                debug_log!("record_result() - streak reset after {diff_days} days");
                0
            } else {
                stats.current_streak.saturating_add(1)
            }
        }
        None => stats.current_streak.saturating_add(1),
    };

    Ok(UserStats {
        played_games: stats.played_games.saturating_add(1),
        won_games: if won {
            stats.won_games.saturating_add(1)
        } else {
            stats.won_games
        },
        current_streak,
        last_updated: Some(now),
    })
}
