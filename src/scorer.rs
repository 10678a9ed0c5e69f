use crate::debug_log;
use crate::error::{Error, Result};

/// Result for one guessed letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// Right letter, right position (`+1`).
    Match,
    /// Letter appears elsewhere in the secret (`0`).
    PartialMatch,
    /// Letter absent from the secret (`-1`).
    NoMatch,
}

impl Feedback {
    #[must_use]
    pub fn code(self) -> i8 {
        match self {
            Feedback::Match => 1,
            Feedback::PartialMatch => 0,
            Feedback::NoMatch => -1,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Feedback::Match => 'G',
            Feedback::PartialMatch => 'Y',
            Feedback::NoMatch => 'X',
        }
    }
}

/// Score `guess` against `secret`, one code per position.
///
/// Each position is judged on its own: a repeated guess letter is marked
/// present every time the secret contains it, even once.
///
/// # Errors
///
/// Returns `Error::InvalidInput` when the lengths differ.
pub fn score(secret: &str, guess: &str) -> Result<Vec<Feedback>> {
    let secret_chars: Vec<char> = secret.chars().map(|c| c.to_ascii_uppercase()).collect();
    let guess_chars: Vec<char> = guess.chars().map(|c| c.to_ascii_uppercase()).collect();
    if guess_chars.len() != secret_chars.len() {
        return Err(Error::InvalidInput(format!(
            "word must be {} letters",
            secret_chars.len()
        )));
    }

    let feedback = guess_chars
        .iter()
        .zip(&secret_chars)
        .map(|(&g, &s)| {
            let result = if g == s {
                Feedback::Match
            } else if secret_chars.contains(&g) {
                Feedback::PartialMatch
            } else {
                Feedback::NoMatch
            };
            debug_log!("score() - letter {g}: {result:?}");
            result
        })
        .collect();
    Ok(feedback)
}

#[must_use]
pub fn codes(feedback: &[Feedback]) -> Vec<i8> {
    feedback.iter().map(|f| f.code()).collect()
}

#[must_use]
pub fn is_solved(feedback: &[Feedback]) -> bool {
    !feedback.is_empty() && feedback.iter().all(|f| *f == Feedback::Match)
}
