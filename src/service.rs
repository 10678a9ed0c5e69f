//! Request-level operations an HTTP layer maps its routes onto.

use crate::config::Config;
use crate::daily::{DailyWord, calendar_day, date_seed};
use crate::debug_log;
use crate::error::{Error, Result};
use crate::scorer::{self, Feedback};
use crate::store::{User, UserStore};
use crate::streak::{self, UserStats};
use crate::token::{Claims, TokenSigner};
use crate::wordbank::{self, WordList};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for Account {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub account: Account,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub date: NaiveDate,
    pub seed: u64,
    pub word: String,
}

pub struct GameService {
    daily: DailyWord,
    store: UserStore,
    signer: Option<TokenSigner>,
    bcrypt_cost: u32,
    max_attempts: usize,
}

impl GameService {
    /// Load the word list and user store named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for invalid settings or an unusable
    /// word list, and `Error::Io`/`Error::Json` if the store cannot be read.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let words = wordbank::load_word_list(config.word_list_path.as_deref())?;
        let store = match &config.data_path {
            Some(path) => UserStore::open(path)?,
            None => UserStore::in_memory(),
        };
        Self::new(config, words, store)
    }

    /// # Errors
    ///
    /// Returns `Error::Configuration` for invalid settings.
    pub fn new(config: &Config, words: WordList, store: UserStore) -> Result<Self> {
        config.validate()?;
        let signer = config
            .token_secret
            .as_deref()
            .map(|secret| TokenSigner::new(secret, config.token_lifetime))
            .transpose()?;
        log::info!(
            "Game service ready: {} words, zone {}, store {}",
            words.len(),
            config.zone,
            store
                .path()
                .map_or_else(|| "in memory".to_string(), |p| p.display().to_string())
        );
        Ok(Self {
            daily: DailyWord::new(words, config.zone),
            store,
            signer,
            bcrypt_cost: config.bcrypt_cost,
            max_attempts: config.max_attempts,
        })
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        wordbank::WORD_LENGTH
    }

    fn signer(&self) -> Result<&TokenSigner> {
        self.signer
            .as_ref()
            .ok_or_else(|| Error::Configuration("OCTURDLE_JWT_SECRET is not set".to_string()))
    }

    /// Today's puzzle, including the secret word. Operators only.
    ///
    /// # Errors
    ///
    /// Propagates word selection failures.
    pub fn today(&self, now: DateTime<Utc>) -> Result<Puzzle> {
        let date = calendar_day(now, self.daily.zone());
        Ok(Puzzle {
            date,
            seed: date_seed(date),
            word: self.daily.word_for(now)?,
        })
    }

    /// Score `guess` against today's word.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the guess has the wrong length.
    pub fn feedback(&self, guess: &str, now: DateTime<Utc>) -> Result<Vec<Feedback>> {
        let secret = self.daily.word_for(now)?;
        scorer::score(&secret, &guess.trim().to_ascii_uppercase())
    }

    /// Create an account with zeroed stats.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for an empty username or password and
    /// `Error::UsernameTaken` if the name is in use.
    pub fn register(&self, username: &str, password: &str, now: DateTime<Utc>) -> Result<Account> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("username is required".to_string()));
        }
        if password.is_empty() {
            return Err(Error::InvalidInput("password is required".to_string()));
        }
        if self.store.find_by_username(username).is_some() {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: bcrypt::hash(password, self.bcrypt_cost)?,
            created_at: now,
            stats: UserStats::default(),
        };
        let account = Account::from(&user);
        self.store.insert(user)?;
        log::info!("Registered user {username}");
        Ok(account)
    }

    /// Register `username` unless it already exists. Returns whether it was created.
    ///
    /// # Errors
    ///
    /// Same as `register`, except that an existing username is not an error.
    pub fn seed_user(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<(Account, bool)> {
        if let Some(existing) = self.store.find_by_username(username.trim()) {
            return Ok((Account::from(&existing), false));
        }
        match self.register(username, password, now) {
            Ok(account) => Ok((account, true)),
            Err(Error::UsernameTaken(_)) => self
                .store
                .find_by_username(username.trim())
                .map(|u| (Account::from(&u), false))
                .ok_or_else(|| Error::UserNotFound(username.to_string())),
            Err(e) => Err(e),
        }
    }

    /// Check credentials and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCredentials` for an unknown user or wrong password.
    pub fn login(&self, username: &str, password: &str, now: DateTime<Utc>) -> Result<Session> {
        let signer = self.signer()?;
        let user = self
            .store
            .find_by_username(username.trim())
            .ok_or(Error::InvalidCredentials)?;
        if !bcrypt::verify(password, &user.password_hash)? {
            debug_log!("login() - password mismatch for {}", user.username);
            return Err(Error::InvalidCredentials);
        }
        let token = signer.issue(user.id, &user.username, now)?;
        Ok(Session {
            token,
            account: Account::from(&user),
        })
    }

    /// # Errors
    ///
    /// Returns `Error::Unauthorized` for an invalid token.
    pub fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        self.signer()?.verify(token, now)
    }

    /// Record today's finished game for the token's user.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyUpdated` if a game was already recorded today.
    pub fn record_result(&self, token: &str, won: bool, now: DateTime<Utc>) -> Result<UserStats> {
        let claims = self.authenticate(token, now)?;
        let zone = self.daily.zone();
        let stats = self
            .store
            .update_stats(claims.sub, |stats| streak::record_result(stats, won, now, zone))?;
        log::info!(
            "Recorded {} for {}: streak {}",
            if won { "win" } else { "loss" },
            claims.username,
            stats.current_streak
        );
        Ok(stats)
    }

    /// # Errors
    ///
    /// Returns `Error::Unauthorized` for an invalid token and
    /// `Error::UserNotFound` if the account no longer exists.
    pub fn stats(&self, token: &str, now: DateTime<Utc>) -> Result<UserStats> {
        let claims = self.authenticate(token, now)?;
        self.store
            .get(claims.sub)
            .map(|user| user.stats)
            .ok_or_else(|| Error::UserNotFound(claims.sub.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn config() -> Config {
        Config {
            token_secret: Some("test-secret".to_string()),
            bcrypt_cost: 4,
            ..Config::default()
        }
    }

    fn service_with(words: &[&str]) -> GameService {
        let words = WordList::new(words.iter().map(|w| (*w).to_string()).collect()).unwrap();
        GameService::new(&config(), words, UserStore::in_memory()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_feedback_against_todays_word() {
        let service = service_with(&["ABCDEFGH"]);
        let result = service.feedback("hgfedcba", now()).unwrap();
        assert_eq!(scorer::codes(&result), vec![0; 8]);
    }

    #[test]
    fn test_feedback_wrong_length_is_400() {
        let service = service_with(&["ABCDEFGH"]);
        let err = service.feedback("ABC", now()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "word must be 8 letters");
    }

    #[test]
    fn test_feedback_rejects_length_changing_case_mapping() {
        // Unicode upper-casing would turn the 7-letter guess into 8 letters.
        let service = service_with(&["ABCDEFSS"]);
        let err = service.feedback("abcdefß", now()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.to_string(), "word must be 8 letters");
    }

    #[test]
    fn test_today_reports_seed() {
        let service = service_with(&["ABCDEFGH"]);
        let puzzle = service.today(now()).unwrap();
        assert_eq!(puzzle.seed, 20_240_307);
        assert_eq!(puzzle.word, "ABCDEFGH");
    }

    #[test]
    fn test_register_login_record_flow() {
        let service = service_with(&["ABCDEFGH"]);
        let account = service.register("  tester ", "password123", now()).unwrap();
        assert_eq!(account.username, "tester");

        let session = service.login("tester", "password123", now()).unwrap();
        assert_eq!(session.account.id, account.id);
        assert_eq!(service.stats(&session.token, now()).unwrap(), UserStats::default());

        let stats = service.record_result(&session.token, true, now()).unwrap();
        assert_eq!((stats.played_games, stats.won_games, stats.current_streak), (1, 1, 1));

        let err = service.record_result(&session.token, false, now()).unwrap_err();
        assert!(matches!(err, Error::AlreadyUpdated));
        assert_eq!(err.status_code(), 429);
        assert_eq!(service.stats(&session.token, now()).unwrap(), stats);
    }

    #[test]
    fn test_register_validation() {
        let service = service_with(&["ABCDEFGH"]);
        assert!(matches!(service.register(" ", "pw", now()), Err(Error::InvalidInput(_))));
        assert!(matches!(service.register("a", "", now()), Err(Error::InvalidInput(_))));
        service.register("a", "pw", now()).unwrap();
        assert!(matches!(service.register("a", "pw", now()), Err(Error::UsernameTaken(_))));
    }

    #[test]
    fn test_login_rejections_share_one_error() {
        let service = service_with(&["ABCDEFGH"]);
        service.register("tester", "right", now()).unwrap();
        let wrong_password = service.login("tester", "wrong", now()).unwrap_err();
        let unknown_user = service.login("nobody", "right", now()).unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(wrong_password.status_code(), 401);
    }

    #[test]
    fn test_seed_user_is_idempotent() {
        let service = service_with(&["ABCDEFGH"]);
        let (first, created) = service.seed_user("tester", "password123", now()).unwrap();
        assert!(created);
        let (second, created) = service.seed_user("tester", "other", now()).unwrap();
        assert!(!created);
        assert_eq!(first, second);
        assert!(service.login("tester", "password123", now()).is_ok());
    }

    #[test]
    fn test_expired_token_cannot_record() {
        let service = service_with(&["ABCDEFGH"]);
        service.register("tester", "pw", now()).unwrap();
        let session = service.login("tester", "pw", now()).unwrap();
        let later = now() + Duration::days(2);
        let err = service.record_result(&session.token, true, later).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_login_without_secret_is_configuration_error() {
        let config = Config {
            bcrypt_cost: 4,
            ..Config::default()
        };
        let words = WordList::new(vec!["ABCDEFGH".to_string()]).unwrap();
        let service = GameService::new(&config, words, UserStore::in_memory()).unwrap();
        service.register("tester", "pw", now()).unwrap();
        assert!(matches!(
            service.login("tester", "pw", now()),
            Err(Error::Configuration(_))
        ));
    }
}
