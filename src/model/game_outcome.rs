use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Difficulty, GameFeedback};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    AttemptsExhausted,
    TimeUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won {
        playthrough_id: Uuid,
        difficulty: Difficulty,
        attempts: u32,
        elapsed_secs: u32,
    },
    Lost {
        playthrough_id: Uuid,
        difficulty: Difficulty,
        reason: LossReason,
        attempts: u32,
        elapsed_secs: u32,
    },
}

impl GameOutcome {
    pub fn is_won(&self) -> bool {
        matches!(self, GameOutcome::Won { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            GameOutcome::Won { attempts, .. } | GameOutcome::Lost { attempts, .. } => *attempts,
        }
    }
}

/// What `submit_guess` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    NotSubmitted,
    Continue(GameFeedback),
    GameOver(GameOutcome),
}

impl SubmitResult {
    pub fn is_game_over(&self) -> bool {
        matches!(self, SubmitResult::GameOver(_))
    }
}
