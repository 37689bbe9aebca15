mod difficulty;
mod game_engine_command;
mod game_engine_event;
mod game_guess;
mod game_outcome;
mod game_state;
mod stored_game_state;
mod timer_state;

pub use difficulty::{Difficulty, DifficultySettings, UnknownDifficulty};
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::GameEngineEvent;
pub use game_guess::{format_digits, Code, GameFeedback, GameGuess, CODE_LENGTH, MAX_DIGIT};
pub use game_outcome::{GameOutcome, LossReason, SubmitResult};
pub use game_state::GameState;
pub use stored_game_state::StoredGameState;
pub use timer_state::TimerState;
