use super::{Difficulty, GameState};

#[derive(Debug, Clone)]
pub enum GameEngineCommand {
    NewGame(Difficulty),
    AddNumber(u8),
    RemoveLastNumber,
    SubmitGuess,
    ResetGame,
    UpdateElapsedTime(u32), // whole seconds since start
    TimeUp,
    LoadState(Box<GameState>),
}
