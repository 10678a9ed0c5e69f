use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

/// Letters per puzzle word.
pub const WORD_LENGTH: usize = 8;

/// Ordered, non-empty, immutable list of upper-cased puzzle words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Builds a list from already-normalized words.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `words` is empty.
    pub fn new(words: Vec<String>) -> Result<Self> {
        if words.is_empty() {
            return Err(Error::Configuration("word list is empty".to_string()));
        }
        Ok(Self { words })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// True for exactly `WORD_LENGTH` ASCII letters, in either case.
#[must_use]
pub fn is_valid_word(word: &str) -> bool {
    word.len() == WORD_LENGTH && word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Parse whitespace-separated tokens, keeping the ones that are exactly
/// `WORD_LENGTH` letters. Tokens are upper-cased.
pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    data.split_whitespace()
        .filter_map(|token| {
            let word = token.to_ascii_uppercase();
            if is_valid_word(&word) {
                Some(word)
            } else {
                log::warn!("Skipping word list token '{token}': expected {WORD_LENGTH} letters");
                None
            }
        })
        .collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)?;
    Ok(load_wordbank_from_str(&data))
}

/// Load the word list from `path`, or the embedded list when `path` is `None`.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read and `Error::Configuration`
/// if no usable word remains.
pub fn load_word_list(path: Option<&Path>) -> Result<WordList> {
    let words = match path {
        Some(path) => {
            let words = load_wordbank_from_file(path)?;
            log::info!("Loaded {} words from {}", words.len(), path.display());
            words
        }
        None => load_wordbank_from_str(EMBEDDED_WORDBANK),
    };
    WordList::new(words)
}
