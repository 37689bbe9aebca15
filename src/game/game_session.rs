use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

use super::auto_saver::AutoSaver;
use super::countdown_timer::{CountdownTimer, TimerTick};
use super::game_engine::GameEngine;
use super::game_persistence::GamePersistence;
use super::secret_generator::SecretGenerator;
use super::settings::Settings;
use crate::clock::Clock;
use crate::destroyable::Destroyable;
use crate::events::{Channel, EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{GameEngineCommand, GameEngineEvent, GameState, SubmitResult};
use crate::storage::KeyValueStore;

/// Owns one player's game: the engine plus the timer and auto-saver that
/// observe it. Everything runs on the caller's thread; `poll` is the
/// scheduling point for timer ticks and debounced saves.
pub struct GameSession {
    engine: Rc<RefCell<GameEngine>>,
    latest_state: Rc<RefCell<GameState>>,
    timer: Rc<RefCell<CountdownTimer>>,
    auto_saver: Rc<RefCell<AutoSaver>>,
    persistence: Rc<GamePersistence>,
    command_emitter: EventEmitter<GameEngineCommand>,
    event_observer: EventObserver<GameEngineEvent>,
    subscriptions: Vec<Unsubscriber<GameEngineEvent>>,
}

impl GameSession {
    pub fn new(
        settings: &Settings,
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        seed: Option<u64>,
    ) -> Self {
        let (command_emitter, command_observer) = Channel::new();
        let (event_emitter, event_observer) = Channel::new();

        let persistence = Rc::new(GamePersistence::new(
            store,
            clock.clone(),
            settings.max_saved_game_age,
        ));
        let timer = Rc::new(RefCell::new(CountdownTimer::new(
            clock.clone(),
            settings.tick_interval,
        )));
        let auto_saver = Rc::new(RefCell::new(AutoSaver::new(
            persistence.clone(),
            clock.clone(),
            settings.autosave_debounce,
        )));
        let latest_state = Rc::new(RefCell::new(GameState::default()));
        let latest = latest_state.clone();
        let subscriptions = vec![
            event_observer.subscribe(move |event: &GameEngineEvent| {
                if let GameEngineEvent::StateChanged(state) = event {
                    *latest.borrow_mut() = state.clone();
                }
            }),
            Self::wire_handler(&event_observer, timer.clone()),
            Self::wire_handler(&event_observer, auto_saver.clone()),
        ];

        let engine = GameEngine::new(
            command_observer,
            event_emitter,
            SecretGenerator::new(seed),
            clock,
        );

        Self {
            engine,
            latest_state,
            timer,
            auto_saver,
            persistence,
            command_emitter,
            event_observer,
            subscriptions,
        }
    }

    fn wire_handler<H>(
        observer: &EventObserver<GameEngineEvent>,
        handler: Rc<RefCell<H>>,
    ) -> Unsubscriber<GameEngineEvent>
    where
        H: EventHandler<GameEngineEvent> + 'static,
    {
        observer.subscribe(move |event| handler.borrow_mut().handle_event(event))
    }

    /// Where presentation code listens for state changes and outcomes.
    ///
    /// Listeners run while the engine is still handling a command. They may
    /// read `state()`, which already reflects the event being delivered, but
    /// must not `dispatch` or `submit_guess` from inside the callback.
    pub fn observer(&self) -> EventObserver<GameEngineEvent> {
        self.event_observer.clone()
    }

    pub fn state(&self) -> GameState {
        self.latest_state.borrow().clone()
    }

    /// Loads a saved game if a usable one exists.
    pub fn restore(&self) -> bool {
        match self.persistence.load() {
            Some(state) => {
                self.dispatch(GameEngineCommand::LoadState(Box::new(state)));
                true
            }
            None => false,
        }
    }

    pub fn dispatch(&self, command: GameEngineCommand) {
        self.command_emitter.emit(command);
    }

    pub fn submit_guess(&self) -> SubmitResult {
        self.engine.borrow_mut().submit_guess()
    }

    /// Runs whatever scheduled work is due.
    pub fn poll(&self) {
        // save first: the tick below re-arms the debounce
        self.auto_saver.borrow_mut().poll();

        let tick = self.timer.borrow_mut().tick();
        match tick {
            Some(TimerTick::Elapsed(secs)) => {
                self.dispatch(GameEngineCommand::UpdateElapsedTime(secs))
            }
            Some(TimerTick::TimeUp(time_limit)) => {
                self.dispatch(GameEngineCommand::UpdateElapsedTime(time_limit));
                self.dispatch(GameEngineCommand::TimeUp);
            }
            None => (),
        }
    }

    /// Writes a pending save now instead of waiting out the debounce.
    pub fn flush(&self) -> bool {
        self.auto_saver.borrow_mut().flush()
    }

    pub fn clear_saved_game(&self) {
        info!(target: "persistence", "Discarding saved game");
        self.auto_saver.borrow_mut().cancel();
        self.persistence.clear();
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.borrow().is_running()
    }
}

impl Destroyable for GameSession {
    fn destroy(&mut self) {
        debug!(target: "game_state", "Tearing down session");
        self.timer.borrow_mut().cancel();
        self.auto_saver.borrow_mut().cancel();
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.engine.borrow_mut().destroy();
    }
}
