use log::trace;
use std::rc::Rc;
use std::time::Duration;

use super::game_persistence::GamePersistence;
use crate::clock::Clock;
use crate::events::EventHandler;
use crate::model::{GameEngineEvent, GameState};

#[derive(Debug)]
struct PendingSave {
    state: GameState,
    due_at: i64,
}

/// Trailing-edge debounce in front of `GamePersistence::save`: a burst of
/// changes produces one write of the latest state.
pub struct AutoSaver {
    persistence: Rc<GamePersistence>,
    clock: Rc<dyn Clock>,
    debounce_ms: i64,
    pending: Option<PendingSave>,
}

impl AutoSaver {
    pub fn new(persistence: Rc<GamePersistence>, clock: Rc<dyn Clock>, debounce: Duration) -> Self {
        Self {
            persistence,
            clock,
            debounce_ms: debounce.as_millis() as i64,
            pending: None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn schedule(&mut self, state: &GameState) {
        let due_at = self.clock.now_ms() + self.debounce_ms;
        trace!(target: "persistence", "Save scheduled for {}", due_at);
        self.pending = Some(PendingSave {
            state: state.clone(),
            due_at,
        });
    }

    /// Writes the pending state once its deadline has passed.
    pub fn poll(&mut self) -> bool {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.due_at <= self.clock.now_ms());
        due && self.flush()
    }

    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => self.persistence.save(&pending.state),
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            trace!(target: "persistence", "Pending save cancelled");
        }
    }
}

impl EventHandler<GameEngineEvent> for AutoSaver {
    fn handle_event(&mut self, event: &GameEngineEvent) {
        match event {
            GameEngineEvent::StateChanged(state) if state.is_game_over => {
                self.cancel();
                self.persistence.clear();
            }
            GameEngineEvent::StateChanged(state) if state.difficulty.is_some() => {
                self.schedule(state)
            }
            GameEngineEvent::StateChanged(_) => self.cancel(),
            GameEngineEvent::GameReset => {
                self.cancel();
                self.persistence.clear();
            }
            _ => (),
        }
    }
}
