use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use std::rc::Rc;
use std::time::Duration;

use crate::clock::Clock;
use crate::error::{StorageError, ValidationError};
use crate::model::{GameState, StoredGameState, CODE_LENGTH, MAX_DIGIT};
use crate::storage::KeyValueStore;

pub const STORAGE_KEY: &str = "chainbreaker-game-state";
pub const STORAGE_VERSION: &str = "1.0";

/// Saves the running game under a single namespaced key and restores it at
/// startup. Nothing here fails loudly: a bad entry is deleted and treated as
/// absent.
pub struct GamePersistence {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    max_age: Duration,
}

impl GamePersistence {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>, max_age: Duration) -> Self {
        Self {
            store,
            clock,
            max_age,
        }
    }

    /// Writes `state` if it is a game in progress. Returns whether it was written.
    pub fn save(&self, state: &GameState) -> bool {
        if state.difficulty.is_none() || state.is_game_over {
            return false;
        }
        let stored = StoredGameState::new(state.clone(), STORAGE_VERSION, self.clock.now_ms());
        let written = serde_json::to_string(&stored)
            .map_err(StorageError::from)
            .and_then(|contents| self.store.set_item(STORAGE_KEY, &contents));
        match written {
            Ok(()) => {
                debug!(target: "persistence", "Game state saved successfully");
                true
            }
            Err(err) => {
                warn!(target: "persistence", "Failed to save game state: {}", err);
                false
            }
        }
    }

    pub fn load(&self) -> Option<GameState> {
        let contents = match self.store.get_item(STORAGE_KEY) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(err) => {
                error!(target: "persistence", "Error loading game state: {}", err);
                self.clear();
                return None;
            }
        };

        match self.parse(&contents) {
            Ok(state) => {
                info!(target: "persistence", "Restored saved game");
                Some(state)
            }
            Err(reason) => {
                info!(target: "persistence", "{}, starting fresh", reason);
                self.clear();
                None
            }
        }
    }

    pub fn clear(&self) {
        match self.store.remove_item(STORAGE_KEY) {
            Ok(()) => debug!(target: "persistence", "Saved game state cleared"),
            Err(err) => error!(target: "persistence", "Error clearing saved state: {}", err),
        }
    }

    fn parse(&self, contents: &str) -> Result<GameState, String> {
        let value: Value = serde_json::from_str(contents)
            .map_err(|err| format!("Saved game state is not valid JSON ({})", err))?;

        if value.get("version").and_then(Value::as_str) != Some(STORAGE_VERSION) {
            return Err("Incompatible game state version".to_string());
        }

        let saved_at = value
            .get("savedAt")
            .and_then(Value::as_i64)
            .ok_or_else(|| "Saved game state has no save time".to_string())?;
        let age_ms = self.clock.now_ms().saturating_sub(saved_at);
        if age_ms > self.max_age.as_millis() as i64 {
            return Err("Saved game state is too old".to_string());
        }

        validate_game_state(&value).map_err(|err| format!("Invalid saved game state: {}", err))?;

        serde_json::from_value::<StoredGameState>(value)
            .map(StoredGameState::into_game_state)
            .map_err(|err| format!("Invalid saved game state: {}", err))
    }
}

/// Structural check a restored payload must pass before it is trusted.
pub fn validate_game_state(value: &Value) -> Result<(), ValidationError> {
    let state = value.as_object().ok_or(ValidationError::NotAnObject)?;

    validate_digits(field(state, "secretCode")?, "secretCode", Some(CODE_LENGTH))?;
    validate_digits(field(state, "currentGuess")?, "currentGuess", None)?;

    let guesses = field(state, "guesses")?
        .as_array()
        .ok_or(ValidationError::WrongType("guesses"))?;
    for entry in guesses {
        let entry = entry
            .as_object()
            .ok_or(ValidationError::WrongType("guesses"))?;
        validate_digits(field(entry, "guess")?, "guess", Some(CODE_LENGTH))?;
        let feedback = field(entry, "feedback")?
            .as_object()
            .ok_or(ValidationError::WrongType("feedback"))?;
        for name in ["correct", "partial"] {
            if !is_integer(field(feedback, name)?) {
                return Err(ValidationError::WrongType(name));
            }
        }
    }

    for name in ["attemptsLeft", "maxAttempts", "elapsedTime"] {
        if !field(state, name)?.is_number() {
            return Err(ValidationError::WrongType(name));
        }
    }
    for name in ["isGameOver", "isWon"] {
        if !field(state, name)?.is_boolean() {
            return Err(ValidationError::WrongType(name));
        }
    }

    let difficulty = field(state, "difficulty")?;
    if !(difficulty.is_null() || difficulty.is_string()) {
        return Err(ValidationError::WrongType("difficulty"));
    }
    let start_time = field(state, "startTime")?;
    if !(start_time.is_null() || start_time.is_number()) {
        return Err(ValidationError::WrongType("startTime"));
    }

    Ok(())
}

fn field<'a>(
    object: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, ValidationError> {
    object.get(name).ok_or(ValidationError::MissingField(name))
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

/// `exact_len` of `None` means "at most `CODE_LENGTH`".
fn validate_digits(
    value: &Value,
    name: &'static str,
    exact_len: Option<usize>,
) -> Result<(), ValidationError> {
    let digits = value.as_array().ok_or(ValidationError::WrongType(name))?;
    let length_ok = match exact_len {
        Some(len) => digits.len() == len,
        None => digits.len() <= CODE_LENGTH,
    };
    if !length_ok {
        return Err(ValidationError::BadLength(name));
    }
    for digit in digits {
        match digit.as_u64() {
            Some(d) if d <= u64::from(MAX_DIGIT) => (),
            Some(_) => return Err(ValidationError::DigitOutOfRange(name)),
            None if digit.is_number() => return Err(ValidationError::DigitOutOfRange(name)),
            None => return Err(ValidationError::WrongType(name)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::{Difficulty, GameFeedback, GameGuess};
    use crate::storage::MemoryStore;
    use crate::tests::UsingLogger;
    use serde_json::json;
    use test_context::test_context;

    const NOW: i64 = 1_700_000_000_000;
    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn setup() -> (GamePersistence, Rc<MemoryStore>, Rc<ManualClock>) {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(NOW));
        (
            GamePersistence::new(store.clone(), clock.clone(), DAY),
            store,
            clock,
        )
    }

    fn mid_game() -> GameState {
        GameState {
            secret_code: vec![5, 0, 9, 2],
            guesses: vec![GameGuess::new([5, 9, 1, 1], GameFeedback::new(1, 1))],
            current_guess: vec![3, 7],
            attempts_left: 9,
            max_attempts: 10,
            difficulty: Some(Difficulty::Normal),
            is_game_over: false,
            is_won: false,
            start_time: Some(NOW - 60_000),
            elapsed_time: 60,
        }
    }

    fn stored_value(store: &MemoryStore) -> Value {
        serde_json::from_str(&store.get_item(STORAGE_KEY).unwrap().unwrap()).unwrap()
    }

    fn tampered(store: &MemoryStore, edit: impl FnOnce(&mut Value)) {
        let mut value = stored_value(store);
        edit(&mut value);
        store
            .set_item(STORAGE_KEY, &value.to_string())
            .unwrap();
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_round_trip(_: &mut UsingLogger) {
        let (persistence, store, clock) = setup();
        assert!(persistence.save(&mid_game()));

        let value = stored_value(&store);
        assert_eq!(value["version"], STORAGE_VERSION);
        assert_eq!(value["savedAt"], NOW);

        clock.advance_secs(60 * 60);
        assert_eq!(persistence.load(), Some(mid_game()));
        assert!(!store.is_empty());
    }

    #[test]
    fn test_nothing_saved_without_game_or_after_it_ends() {
        let (persistence, store, _clock) = setup();
        assert!(!persistence.save(&GameState::default()));
        assert!(!persistence.save(&GameState {
            is_game_over: true,
            ..mid_game()
        }));
        assert!(store.is_empty());
        assert_eq!(persistence.load(), None);
    }

    #[test]
    fn test_version_mismatch_is_discarded() {
        let (persistence, store, _clock) = setup();
        persistence.save(&mid_game());
        tampered(&store, |v| v["version"] = json!("0.9"));

        assert_eq!(persistence.load(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_stale_entry_is_discarded() {
        let (persistence, store, clock) = setup();
        persistence.save(&mid_game());
        clock.advance_ms(DAY.as_millis() as i64);
        assert!(persistence.load().is_some());

        clock.advance_ms(1);
        assert_eq!(persistence.load(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unparseable_entry_is_discarded() {
        let (persistence, store, _clock) = setup();
        store.set_item(STORAGE_KEY, "{not json").unwrap();
        assert_eq!(persistence.load(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_tampered_entries_are_discarded() {
        let edits: Vec<(&str, Box<dyn Fn(&mut Value)>)> = vec![
            ("short secret", Box::new(|v: &mut Value| v["secretCode"] = json!([1, 2, 3]))),
            ("digit out of range", Box::new(|v: &mut Value| v["secretCode"] = json!([1, 2, 3, 12]))),
            ("fractional digit", Box::new(|v: &mut Value| v["secretCode"] = json!([1, 2, 3, 1.5]))),
            ("long current guess", Box::new(|v: &mut Value| v["currentGuess"] = json!([1, 2, 3, 4, 5]))),
            ("string digit", Box::new(|v: &mut Value| v["currentGuess"] = json!(["1"]))),
            ("short guess", Box::new(|v: &mut Value| v["guesses"][0]["guess"] = json!([1]))),
            ("missing feedback", Box::new(|v: &mut Value| v["guesses"][0] = json!({"guess": [1, 2, 3, 4]}))),
            (
                "fractional feedback",
                Box::new(|v: &mut Value| v["guesses"][0]["feedback"]["correct"] = json!(0.5)),
            ),
            ("attempts as string", Box::new(|v: &mut Value| v["attemptsLeft"] = json!("9"))),
            ("difficulty as number", Box::new(|v: &mut Value| v["difficulty"] = json!(2))),
            ("unknown difficulty", Box::new(|v: &mut Value| v["difficulty"] = json!("insane"))),
            ("won as string", Box::new(|v: &mut Value| v["isWon"] = json!("false"))),
            ("start time as string", Box::new(|v: &mut Value| v["startTime"] = json!("now"))),
            ("missing elapsed time", Box::new(|v: &mut Value| {
                v.as_object_mut().unwrap().remove("elapsedTime");
            })),
        ];

        for (name, edit) in edits {
            let (persistence, store, _clock) = setup();
            persistence.save(&mid_game());
            tampered(&store, |v| edit(v));
            assert_eq!(persistence.load(), None, "{} should be rejected", name);
            assert!(store.is_empty(), "{} should be cleared", name);
        }
    }

    #[test]
    fn test_null_difficulty_and_start_time_are_structurally_valid() {
        let mut value = serde_json::to_value(GameState {
            secret_code: vec![0, 0, 0, 0],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(validate_game_state(&value), Ok(()));

        value["secretCode"] = json!([]);
        assert_eq!(
            validate_game_state(&value),
            Err(ValidationError::BadLength("secretCode"))
        );
        assert_eq!(
            validate_game_state(&json!([1, 2])),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn test_quota_failure_is_swallowed() {
        let store = Rc::new(MemoryStore::with_quota(16));
        let clock = Rc::new(ManualClock::new(NOW));
        let persistence = GamePersistence::new(store.clone(), clock, DAY);

        assert!(!persistence.save(&mid_game()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_removes_entry() {
        let (persistence, store, _clock) = setup();
        persistence.save(&mid_game());
        persistence.clear();
        assert!(store.is_empty());
        persistence.clear();
    }
}
