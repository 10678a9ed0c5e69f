//! Runtime configuration.
//!
//! Values come from the command line or `OCTURDLE_*` environment variables
//! (see `cli::Cli`) and are validated here before the service is built.

use crate::error::{Error, Result};
use chrono::{Duration, FixedOffset, Offset, Utc};
use std::path::PathBuf;

pub const DEFAULT_UTC_OFFSET: &str = "+00:00";
pub const DEFAULT_TOKEN_HOURS: i64 = 24;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const DEFAULT_MAX_ATTEMPTS: usize = 6;

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` uses the embedded word list.
    pub word_list_path: Option<PathBuf>,
    /// `None` keeps users in memory only.
    pub data_path: Option<PathBuf>,
    /// Zone that decides where one calendar day ends.
    pub zone: FixedOffset,
    pub token_secret: Option<String>,
    pub token_lifetime: Duration,
    pub bcrypt_cost: u32,
    pub max_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_list_path: None,
            data_path: None,
            zone: Utc.fix(),
            token_secret: None,
            token_lifetime: Duration::hours(DEFAULT_TOKEN_HOURS),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Parse `+05:30`, `-0800`, or `Z` into a fixed offset.
///
/// # Errors
///
/// Returns `Error::Configuration` for anything else.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    value
        .parse::<FixedOffset>()
        .map_err(|e| Error::Configuration(format!("invalid UTC offset '{value}': {e}")))
}

/// Default location of the user data file.
#[must_use]
pub fn default_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("octurdle").join("users.json"))
}

impl Config {
    /// # Errors
    ///
    /// Returns `Error::Configuration` when a value is out of range.
    pub fn validate(&self) -> Result<()> {
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(Error::Configuration(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::Configuration("max attempts must be at least 1".to_string()));
        }
        if self.token_lifetime <= Duration::zero() {
            return Err(Error::Configuration("token lifetime must be positive".to_string()));
        }
        if self.token_secret.as_deref().is_some_and(str::is_empty) {
            return Err(Error::Configuration("token secret is empty".to_string()));
        }
        Ok(())
    }
}
