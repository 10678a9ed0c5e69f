use crate::error::{Error, Result};
use crate::scorer::{Feedback, is_solved};
use crate::service::GameService;
use chrono::{DateTime, Utc};

pub enum UserAction {
    Guess(String),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won { attempts: usize },
    Lost,
    Abandoned,
}

impl GameOutcome {
    /// `Some(won)` for finished rounds, `None` if the player quit.
    #[must_use]
    pub fn result(self) -> Option<bool> {
        match self {
            GameOutcome::Won { .. } => Some(true),
            GameOutcome::Lost => Some(false),
            GameOutcome::Abandoned => None,
        }
    }
}

/// Input and output for one interactive round.
pub trait GameInterface {
    fn display_intro(&mut self, word_length: usize, max_attempts: usize);
    /// `None` means the input was unusable and should be asked for again.
    fn read_guess(&mut self) -> Option<UserAction>;
    fn display_feedback(&mut self, guess: &str, feedback: &[Feedback], attempt: usize, max_attempts: usize);
    fn display_rejected(&mut self, message: &str);
    fn display_outcome(&mut self, outcome: GameOutcome);
}

/// Play today's puzzle until it is solved, the attempts run out, or the
/// player exits. The round belongs to the calendar day of `now`.
///
/// # Errors
///
/// Only non-input failures propagate; a rejected guess is shown and retried.
pub fn game_loop<I: GameInterface>(
    service: &GameService,
    interface: &mut I,
    now: DateTime<Utc>,
) -> Result<GameOutcome> {
    let max_attempts = service.max_attempts();
    interface.display_intro(service.word_length(), max_attempts);

    let mut attempt = 0;
    let outcome = loop {
        if attempt == max_attempts {
            break GameOutcome::Lost;
        }
        let guess = match interface.read_guess() {
            Some(UserAction::Guess(g)) => g,
            Some(UserAction::Exit) => break GameOutcome::Abandoned,
            None => continue,
        };

        let feedback = match service.feedback(&guess, now) {
            Ok(f) => f,
            Err(Error::InvalidInput(message)) => {
                interface.display_rejected(&message);
                continue;
            }
            Err(e) => return Err(e),
        };
        attempt += 1;
        interface.display_feedback(&guess, &feedback, attempt, max_attempts);

        if is_solved(&feedback) {
            break GameOutcome::Won { attempts: attempt };
        }
    };

    interface.display_outcome(outcome);
    Ok(outcome)
}
