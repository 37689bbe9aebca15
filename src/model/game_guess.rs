use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const CODE_LENGTH: usize = 4;
pub const MAX_DIGIT: u8 = 9;

/// A complete code: exactly `CODE_LENGTH` digits in `0..=MAX_DIGIT`.
pub type Code = [u8; CODE_LENGTH];

/// Exact-position matches (`correct`) and right-digit-wrong-place matches (`partial`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameFeedback {
    pub correct: u8,
    pub partial: u8,
}

impl GameFeedback {
    pub fn new(correct: u8, partial: u8) -> Self {
        Self { correct, partial }
    }

    pub fn is_solved(&self) -> bool {
        self.correct as usize == CODE_LENGTH
    }
}

impl fmt::Display for GameFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} correct, {} partial", self.correct, self.partial)
    }
}

#[readonly::make]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameGuess {
    pub guess: Vec<u8>,
    pub feedback: GameFeedback,
}

impl GameGuess {
    pub fn new(guess: Code, feedback: GameFeedback) -> Self {
        Self {
            guess: guess.to_vec(),
            feedback,
        }
    }
}

impl fmt::Display for GameGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", format_digits(&self.guess), self.feedback)
    }
}

pub fn format_digits(digits: &[u8]) -> String {
    digits.iter().join("")
}
