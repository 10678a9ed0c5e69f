use crate::config::{self, Config};
use crate::error::Result;
use crate::game_state::{GameInterface, GameOutcome, UserAction};
use crate::scorer::Feedback;
use crate::streak::UserStats;
use crate::wordbank::{WORD_LENGTH, is_valid_word};
use chrono::Duration;
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Daily eight-letter word game backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Path to a whitespace-separated word list (defaults to the embedded list)
    #[arg(short = 'i', long = "input", env = "OCTURDLE_WORDLIST", global = true)]
    pub wordbank_path: Option<PathBuf>,

    /// User data file
    #[arg(long = "data", env = "OCTURDLE_DATA", global = true)]
    pub data_path: Option<PathBuf>,

    /// UTC offset deciding where a calendar day ends, e.g. +02:00
    #[arg(long, env = "OCTURDLE_UTC_OFFSET", default_value = config::DEFAULT_UTC_OFFSET, global = true)]
    pub utc_offset: String,

    /// Secret used to sign login tokens
    #[arg(long, env = "OCTURDLE_JWT_SECRET", hide_env_values = true, global = true)]
    pub jwt_secret: Option<String>,

    /// Login token lifetime in hours
    #[arg(long, env = "OCTURDLE_TOKEN_HOURS", default_value_t = config::DEFAULT_TOKEN_HOURS, global = true)]
    pub token_hours: i64,

    /// bcrypt cost factor for new password hashes
    #[arg(long, env = "OCTURDLE_BCRYPT_COST", default_value_t = config::DEFAULT_BCRYPT_COST, global = true)]
    pub bcrypt_cost: u32,

    /// Guesses allowed per round in `play`
    #[arg(long, env = "OCTURDLE_MAX_ATTEMPTS", default_value_t = config::DEFAULT_MAX_ATTEMPTS, global = true)]
    pub max_attempts: usize,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Args, Debug)]
pub struct TokenArg {
    /// Token printed by `login`
    #[arg(long, env = "OCTURDLE_TOKEN", hide_env_values = true)]
    pub token: String,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct RecordOutcome {
    /// The game was won
    #[arg(long)]
    pub won: bool,
    /// The game was lost
    #[arg(long)]
    pub lost: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register(Credentials),
    /// Log in and print a token
    Login(Credentials),
    /// Create a test account unless it already exists
    SeedUser {
        #[arg(long, env = "SEED_USERNAME", default_value = "tester")]
        username: String,
        #[arg(long, env = "SEED_PASSWORD", default_value = "password123")]
        password: String,
    },
    /// Score a guess against today's word
    Guess { word: String },
    /// Record today's finished game
    Record {
        #[command(flatten)]
        token: TokenArg,
        #[command(flatten)]
        outcome: RecordOutcome,
    },
    /// Show play statistics
    Stats {
        #[command(flatten)]
        token: TokenArg,
    },
    /// Print today's seed and secret word
    Today,
    /// Play today's puzzle interactively
    Play {
        /// Record the result for this token's user when the round ends
        #[arg(long, env = "OCTURDLE_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl GlobalOptions {
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an unparsable offset or invalid values.
    pub fn to_config(&self) -> Result<Config> {
        let config = Config {
            word_list_path: self.wordbank_path.clone(),
            data_path: self.data_path.clone().or_else(config::default_data_path),
            zone: config::parse_utc_offset(&self.utc_offset)?,
            token_secret: self.jwt_secret.clone(),
            token_lifetime: Duration::hours(self.token_hours),
            bcrypt_cost: self.bcrypt_cost,
            max_attempts: self.max_attempts,
        };
        config.validate()?;
        Ok(config)
    }
}

#[must_use]
pub fn format_feedback(feedback: &[Feedback]) -> String {
    feedback.iter().map(|f| f.as_char()).collect()
}

#[must_use]
pub fn format_codes(feedback: &[Feedback]) -> String {
    let codes: Vec<String> = feedback.iter().map(|f| f.code().to_string()).collect();
    format!("[{}]", codes.join(","))
}

pub fn display_stats<W: Write>(out: &mut W, stats: &UserStats) -> std::io::Result<()> {
    writeln!(out, "Played:         {}", stats.played_games)?;
    writeln!(out, "Won:            {}", stats.won_games)?;
    writeln!(out, "Win rate:       {:.0}%", stats.win_rate() * 100.0)?;
    writeln!(out, "Current streak: {}", stats.current_streak)?;
    match stats.last_updated {
        Some(last) => writeln!(out, "Last played:    {}", last.format("%Y-%m-%d %H:%M UTC")),
        None => writeln!(out, "Last played:    never"),
    }
}

/// CLI implementation of the GameInterface trait
pub struct CliInterface<R: BufRead, W: Write> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self {
            reader,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    // Terminal writes are best effort; a closed stdout ends the round via EOF on input.
    fn say(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn display_intro(&mut self, word_length: usize, max_attempts: usize) {
        self.say(&format!(
            "Guess today's {word_length}-letter word in {max_attempts} tries. G=right spot, Y=elsewhere, X=absent."
        ));
    }

    fn read_guess(&mut self) -> Option<UserAction> {
        self.say(&format!("\nEnter your guess ({WORD_LENGTH} letters, or 'exit' to quit):"));
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) | Err(_) => return Some(UserAction::Exit),
            Ok(_) => {}
        }
        let input = input.trim().to_ascii_uppercase();

        match input.as_str() {
            "EXIT" => Some(UserAction::Exit),
            _ if is_valid_word(&input) => Some(UserAction::Guess(input)),
            _ => {
                self.say(&format!("Invalid guess. Please enter {WORD_LENGTH} letters."));
                None
            }
        }
    }

    fn display_feedback(&mut self, guess: &str, feedback: &[Feedback], attempt: usize, max_attempts: usize) {
        self.say(&format!(
            "{attempt}/{max_attempts}  {guess}  {}",
            format_feedback(feedback)
        ));
    }

    fn display_rejected(&mut self, message: &str) {
        self.say(&format!("Rejected: {message}"));
    }

    fn display_outcome(&mut self, outcome: GameOutcome) {
        let line = match outcome {
            GameOutcome::Won { attempts } => format!("Solved in {attempts}!"),
            GameOutcome::Lost => "Out of guesses. Try again tomorrow.".to_string(),
            GameOutcome::Abandoned => "Exiting.".to_string(),
        };
        self.say(&line);
    }
}
