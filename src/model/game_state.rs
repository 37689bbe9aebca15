use serde::{Deserialize, Serialize};

use super::{Difficulty, GameGuess, CODE_LENGTH};

/// Everything the player's current game consists of. Serialized camelCase
/// because it is the payload of the persisted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub secret_code: Vec<u8>,
    pub guesses: Vec<GameGuess>,
    pub current_guess: Vec<u8>,
    pub attempts_left: u32,
    pub max_attempts: u32,
    pub difficulty: Option<Difficulty>,
    pub is_game_over: bool,
    pub is_won: bool,
    /// Epoch milliseconds.
    pub start_time: Option<i64>,
    /// Whole seconds.
    pub elapsed_time: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            secret_code: Vec::new(),
            guesses: Vec::new(),
            current_guess: Vec::new(),
            attempts_left: 10,
            max_attempts: 10,
            difficulty: None,
            is_game_over: false,
            is_won: false,
            start_time: None,
            elapsed_time: 0,
        }
    }
}

impl GameState {
    pub fn can_submit_guess(&self) -> bool {
        self.current_guess.len() == CODE_LENGTH
    }

    pub fn is_game_active(&self) -> bool {
        !self.is_game_over && self.difficulty.is_some()
    }

    pub fn attempts_used(&self) -> u32 {
        self.guesses.len() as u32
    }

    /// Seconds left on the clock; zero when no game is configured.
    pub fn remaining_time(&self) -> u32 {
        match self.difficulty {
            Some(difficulty) => difficulty.time_limit_secs().saturating_sub(self.elapsed_time),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::default();
        assert!(!state.is_game_active());
        assert!(!state.can_submit_guess());
        assert_eq!(state.remaining_time(), 0);
        assert_eq!(state.attempts_left, state.max_attempts);
    }

    #[test]
    fn test_remaining_time_clamps_at_zero() {
        let state = GameState {
            difficulty: Some(Difficulty::Expert),
            elapsed_time: 100,
            ..Default::default()
        };
        assert_eq!(state.remaining_time(), 140);

        let state = GameState {
            elapsed_time: 1_000,
            ..state
        };
        assert_eq!(state.remaining_time(), 0);
    }

    #[test]
    fn test_camel_case_wire_names() {
        let value = serde_json::to_value(GameState::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "secretCode",
            "guesses",
            "currentGuess",
            "attemptsLeft",
            "maxAttempts",
            "difficulty",
            "isGameOver",
            "isWon",
            "startTime",
            "elapsedTime",
        ] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert!(object["difficulty"].is_null());
        assert!(object["startTime"].is_null());
    }
}
