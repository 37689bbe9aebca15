use serde::{Deserialize, Serialize};

use super::GameState;

/// The persisted entry: the game plus the format version and save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGameState {
    #[serde(flatten)]
    pub game_state: GameState,
    pub version: String,
    /// Epoch milliseconds.
    pub saved_at: i64,
}

impl StoredGameState {
    pub fn new(game_state: GameState, version: &str, saved_at: i64) -> Self {
        Self {
            game_state,
            version: version.to_string(),
            saved_at,
        }
    }

    pub fn into_game_state(self) -> GameState {
        self.game_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    #[test]
    fn test_flattened_wire_shape() {
        let state = GameState {
            secret_code: vec![1, 2, 3, 4],
            difficulty: Some(Difficulty::Hard),
            start_time: Some(1_700_000_000_000),
            ..Default::default()
        };
        let value = serde_json::to_value(StoredGameState::new(state.clone(), "1.0", 42)).unwrap();
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["savedAt"], 42);
        assert_eq!(value["secretCode"], serde_json::json!([1, 2, 3, 4]));
        assert_eq!(value["difficulty"], "hard");

        let back: StoredGameState = serde_json::from_value(value).unwrap();
        assert_eq!(back.into_game_state(), state);
    }
}
