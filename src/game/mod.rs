pub mod auto_saver;
pub mod countdown_timer;
pub mod feedback_scorer;
pub mod game_engine;
pub mod game_persistence;
pub mod game_session;
pub mod secret_generator;
pub mod settings;

pub use auto_saver::AutoSaver;
pub use countdown_timer::{CountdownTimer, TimerTick};
pub use feedback_scorer::score;
pub use game_engine::GameEngine;
pub use game_persistence::{validate_game_state, GamePersistence, STORAGE_KEY, STORAGE_VERSION};
pub use game_session::GameSession;
pub use secret_generator::{generate_secret_code, SecretGenerator};
pub use settings::Settings;
