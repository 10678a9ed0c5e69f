//! Daily secret word selection.
//!
//! The word for a calendar day is picked by seeding a pseudo-random source
//! with the date as a `YYYYMMDD` integer. The concrete source is ChaCha20
//! (`rand_chacha`), whose output stream is stable across releases, so a date
//! maps to the same word on every deployment using the same word list.

use crate::error::{Error, Result};
use crate::wordbank::WordList;
use crate::{debug_log, info_log};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use rand::{Rng, SeedableRng};
use parking_lot::RwLock;
use rand_chacha::ChaCha20Rng;

/// Source of one uniform value in `[0, 1)` per seed.
pub trait PseudoRandomSource: Send + Sync {
    fn uniform(&self, seed: u64) -> f64;
}

/// ChaCha20 seeded with `seed_from_u64`; the first `f64` drawn is the value.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChaChaSource;

impl PseudoRandomSource for ChaChaSource {
    fn uniform(&self, seed: u64) -> f64 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.random::<f64>()
    }
}

/// `2024-03-07` becomes `20240307`.
#[must_use]
pub fn date_seed(date: NaiveDate) -> u64 {
    let year = u64::try_from(date.year()).unwrap_or(0);
    year * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}

/// Calendar day of `instant` in the given zone.
#[must_use]
pub fn calendar_day(instant: DateTime<Utc>, zone: FixedOffset) -> NaiveDate {
    instant.with_timezone(&zone).date_naive()
}

/// Pick the secret word for `date`.
///
/// # Errors
///
/// Returns `Error::Configuration` if the list is empty.
pub fn select_word(
    date: NaiveDate,
    words: &WordList,
    source: &dyn PseudoRandomSource,
) -> Result<String> {
    if words.is_empty() {
        return Err(Error::Configuration("word list is empty".to_string()));
    }
    let seed = date_seed(date);
    let value = source.uniform(seed);
    // Floor of a non-negative product; clamp keeps an out-of-range source in bounds.
    let index = ((value * words.len() as f64).floor().max(0.0) as usize).min(words.len() - 1);
    debug_log!("select_word() - seed {seed} value {value} index {index}");
    words
        .get(index)
        .map(str::to_uppercase)
        .ok_or_else(|| Error::Configuration(format!("word index {index} out of range")))
}

/// Today's secret word, cached with the calendar day it belongs to.
///
/// Every access compares the cached day with the current one and recomputes
/// on rollover, so a long-running process never serves yesterday's word.
pub struct DailyWord {
    words: WordList,
    source: Box<dyn PseudoRandomSource>,
    zone: FixedOffset,
    cached: RwLock<Option<(NaiveDate, String)>>,
}

impl DailyWord {
    #[must_use]
    pub fn new(words: WordList, zone: FixedOffset) -> Self {
        Self::with_source(words, zone, Box::new(ChaChaSource))
    }

    #[must_use]
    pub fn with_source(
        words: WordList,
        zone: FixedOffset,
        source: Box<dyn PseudoRandomSource>,
    ) -> Self {
        Self {
            words,
            source,
            zone,
            cached: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    #[must_use]
    pub fn word_list(&self) -> &WordList {
        &self.words
    }

    /// The secret word for the calendar day containing `now`.
    ///
    /// # Errors
    ///
    /// Propagates `select_word` failures.
    pub fn word_for(&self, now: DateTime<Utc>) -> Result<String> {
        let today = calendar_day(now, self.zone);
        {
            let cached = self.cached.read();
            if let Some((day, word)) = cached.as_ref()
                && *day == today
            {
                return Ok(word.clone());
            }
        }

        let mut cached = self.cached.write();
        // Another caller may have refreshed it between the two locks.
        if let Some((day, word)) = cached.as_ref()
            && *day == today
        {
            return Ok(word.clone());
        }
        let word = select_word(today, &self.words, self.source.as_ref())?;
        info_log!("Daily word recomputed for {today}");
        *cached = Some((today, word.clone()));
        Ok(word)
    }
}
