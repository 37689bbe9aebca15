use super::{GameGuess, GameOutcome, GameState};

#[derive(Debug, Clone)]
pub enum GameEngineEvent {
    StateChanged(GameState),
    GuessScored(GameGuess),
    GameOver(GameOutcome),
    GameReset,
    GameRestored(GameState),
}
