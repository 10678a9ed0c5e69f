// Library interface for octurdle
// This allows integration tests to access internal modules

pub mod cli;
pub mod config;
pub mod daily;
pub mod error;
pub mod game_state;
pub mod logging;
pub mod scorer;
pub mod service;
pub mod store;
pub mod streak;
pub mod token;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use config::Config;
pub use daily::{ChaChaSource, DailyWord, PseudoRandomSource, date_seed, select_word};
pub use error::{Error, Result};
pub use game_state::{GameOutcome, game_loop};
pub use scorer::{Feedback, score};
pub use service::GameService;
pub use store::UserStore;
pub use streak::{UserStats, record_result};
pub use wordbank::{WordList, load_word_list, load_wordbank_from_file, load_wordbank_from_str};
