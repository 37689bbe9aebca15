use log::{debug, info, trace};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use super::feedback_scorer::score;
use super::secret_generator::SecretGenerator;
use super::settings::Settings;
use crate::clock::Clock;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    format_digits, Code, Difficulty, GameEngineCommand, GameEngineEvent, GameGuess, GameOutcome,
    GameState, LossReason, SubmitResult, TimerState, CODE_LENGTH, MAX_DIGIT,
};

/// The game state machine. Sole owner and mutator of the `GameState`; every
/// mutation is published as `GameEngineEvent::StateChanged`.
pub struct GameEngine {
    state: GameState,
    secret_generator: SecretGenerator,
    clock: Rc<dyn Clock>,
    debug_mode: bool,
    current_playthrough_id: Uuid,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl GameEngine {
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        secret_generator: SecretGenerator,
        clock: Rc<dyn Clock>,
    ) -> Rc<RefCell<Self>> {
        let engine = Self {
            state: GameState::default(),
            secret_generator,
            clock,
            debug_mode: Settings::is_debug_mode(),
            current_playthrough_id: Uuid::new_v4(),
            subscription: None,
            game_engine_event_emitter,
        };
        let refcell = Rc::new(RefCell::new(engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        // weak so the subscription does not keep the engine alive
        let engine_handler = Rc::downgrade(&engine);
        let subscription = game_engine_command_observer.subscribe(move |command| {
            if let Some(engine) = engine_handler.upgrade() {
                engine.borrow_mut().handle_command(command.clone());
            }
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn playthrough_id(&self) -> Uuid {
        self.current_playthrough_id
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_state", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::NewGame(difficulty) => self.start_new_game(difficulty),
            GameEngineCommand::AddNumber(digit) => {
                self.add_number_to_guess(digit);
            }
            GameEngineCommand::RemoveLastNumber => {
                self.remove_last_number();
            }
            GameEngineCommand::SubmitGuess => {
                self.submit_guess();
            }
            GameEngineCommand::ResetGame => self.reset_game_state(),
            GameEngineCommand::UpdateElapsedTime(secs) => self.update_elapsed_time(secs),
            GameEngineCommand::TimeUp => {
                self.time_up();
            }
            GameEngineCommand::LoadState(state) => self.load_state(*state),
        }
    }

    /// Replaces whatever game is in progress with a fresh one.
    pub fn start_new_game(&mut self, difficulty: Difficulty) {
        let settings = difficulty.settings();
        let secret = self.secret_generator.generate(settings.allow_duplicates);
        self.current_playthrough_id = Uuid::new_v4();
        self.state = GameState {
            secret_code: secret.to_vec(),
            guesses: Vec::new(),
            current_guess: Vec::new(),
            attempts_left: settings.max_attempts,
            max_attempts: settings.max_attempts,
            difficulty: Some(difficulty),
            is_game_over: false,
            is_won: false,
            start_time: Some(self.clock.now_ms()),
            elapsed_time: 0,
        };
        info!(
            target: "game_state",
            "New game; difficulty: {}; playthrough: {}",
            difficulty,
            self.current_playthrough_id
        );
        if self.debug_mode {
            debug!(target: "game_state", "Secret code: {}", format_digits(&secret));
        }
        self.sync_state();
    }

    /// Appends a digit to the guess being entered. Extra digits, digits above
    /// nine and input while no game is running are ignored.
    pub fn add_number_to_guess(&mut self, digit: u8) -> bool {
        if self.state.current_guess.len() >= CODE_LENGTH
            || !self.state.is_game_active()
            || digit > MAX_DIGIT
        {
            return false;
        }
        self.state.current_guess.push(digit);
        self.sync_state();
        true
    }

    pub fn remove_last_number(&mut self) -> bool {
        if self.state.current_guess.pop().is_none() {
            return false;
        }
        self.sync_state();
        true
    }

    pub fn submit_guess(&mut self) -> SubmitResult {
        if !self.state.is_game_active() {
            return SubmitResult::NotSubmitted;
        }
        let (Ok(guess), Ok(secret)) = (
            Code::try_from(self.state.current_guess.as_slice()),
            Code::try_from(self.state.secret_code.as_slice()),
        ) else {
            return SubmitResult::NotSubmitted;
        };

        let feedback = score(&guess, &secret);
        let scored = GameGuess::new(guess, feedback);
        debug!(target: "game_state", "Guess {}", scored);

        self.state.guesses.push(scored.clone());
        self.state.current_guess.clear();
        self.state.attempts_left = self.state.attempts_left.saturating_sub(1);
        self.state.is_won = feedback.is_solved();
        self.state.is_game_over = self.state.is_won || self.state.attempts_left == 0;

        self.game_engine_event_emitter
            .emit(GameEngineEvent::GuessScored(scored));
        let result = if self.state.is_game_over {
            let reason = (!self.state.is_won).then_some(LossReason::AttemptsExhausted);
            match self.finish(reason) {
                Some(outcome) => SubmitResult::GameOver(outcome),
                None => SubmitResult::Continue(feedback),
            }
        } else {
            SubmitResult::Continue(feedback)
        };
        self.sync_state();
        result
    }

    pub fn reset_game_state(&mut self) {
        info!(target: "game_state", "Game reset");
        self.state = GameState::default();
        self.game_engine_event_emitter.emit(GameEngineEvent::GameReset);
        self.sync_state();
    }

    /// Publishes the clock reading; elapsed time never moves backwards and is
    /// frozen once the game is over.
    pub fn update_elapsed_time(&mut self, secs: u32) {
        if !self.state.is_game_active() || secs <= self.state.elapsed_time {
            return;
        }
        self.state.elapsed_time = secs;
        self.sync_state();
    }

    pub fn time_up(&mut self) -> Option<GameOutcome> {
        if !self.state.is_game_active() {
            return None;
        }
        self.state.is_game_over = true;
        self.state.is_won = false;
        let outcome = self.finish(Some(LossReason::TimeUp));
        self.sync_state();
        outcome
    }

    pub fn load_state(&mut self, state: GameState) {
        info!(
            target: "game_state",
            "Restoring game; difficulty: {:?}; {} guesses made",
            state.difficulty,
            state.guesses.len()
        );
        self.current_playthrough_id = Uuid::new_v4();
        self.state = state;
        self.game_engine_event_emitter
            .emit(GameEngineEvent::GameRestored(self.state.clone()));
        self.sync_state();
    }

    fn finish(&self, loss_reason: Option<LossReason>) -> Option<GameOutcome> {
        let difficulty = self.state.difficulty?;
        let attempts = self.state.attempts_used();
        let elapsed_secs = self
            .state
            .start_time
            .map(|start| {
                TimerState::new(start, difficulty.time_limit_secs())
                    .elapsed_secs(self.clock.now_ms())
                    .min(difficulty.time_limit_secs())
            })
            .unwrap_or(self.state.elapsed_time)
            .max(self.state.elapsed_time);
        let playthrough_id = self.current_playthrough_id;

        let outcome = match loss_reason {
            None => GameOutcome::Won {
                playthrough_id,
                difficulty,
                attempts,
                elapsed_secs,
            },
            Some(reason) => GameOutcome::Lost {
                playthrough_id,
                difficulty,
                reason,
                attempts,
                elapsed_secs,
            },
        };
        info!(target: "game_state", "Game over: {:?}", outcome);
        self.game_engine_event_emitter
            .emit(GameEngineEvent::GameOver(outcome.clone()));
        Some(outcome)
    }

    fn sync_state(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::StateChanged(self.state.clone()));
    }
}
