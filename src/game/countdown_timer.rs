use log::{debug, info};
use std::rc::Rc;
use std::time::Duration;

use crate::clock::Clock;
use crate::events::EventHandler;
use crate::model::{GameEngineEvent, GameState, TimerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Whole seconds since the game started.
    Elapsed(u32),
    /// The budget ran out; carries the clamped elapsed time (the time limit).
    TimeUp(u32),
}

#[derive(Debug, Clone, Copy)]
struct RunningCountdown {
    timer: TimerState,
    next_tick_at: i64,
}

/// Recurring tick for the running game. Runs while a started, unfinished game
/// with a difficulty exists; reports time-up at most once per game.
pub struct CountdownTimer {
    clock: Rc<dyn Clock>,
    tick_interval_ms: i64,
    running: Option<RunningCountdown>,
    guarded: Option<TimerState>,
    time_up_fired: bool,
}

impl CountdownTimer {
    pub fn new(clock: Rc<dyn Clock>, tick_interval: Duration) -> Self {
        Self {
            clock,
            tick_interval_ms: (tick_interval.as_millis() as i64).max(1),
            running: None,
            guarded: None,
            time_up_fired: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Starts, keeps or stops ticking to match `state`.
    pub fn sync(&mut self, state: &GameState) {
        match (state.start_time, state.difficulty) {
            (Some(start), Some(difficulty)) if !state.is_game_over => {
                let timer = TimerState::new(start, difficulty.time_limit_secs());
                if !self.running.is_some_and(|running| running.timer == timer) {
                    self.start(timer);
                }
            }
            _ => self.cancel(),
        }
    }

    fn start(&mut self, timer: TimerState) {
        // a game is identified by its start and its limit together
        if self.guarded != Some(timer) {
            self.guarded = Some(timer);
            self.time_up_fired = false;
        }
        debug!(
            target: "timer",
            "Countdown started; limit {}s; started at {}",
            timer.time_limit_secs,
            timer.started_at_ms
        );
        self.running = Some(RunningCountdown {
            timer,
            next_tick_at: self.clock.now_ms() + self.tick_interval_ms,
        });
    }

    pub fn cancel(&mut self) {
        if self.running.take().is_some() {
            debug!(target: "timer", "Countdown cancelled");
        }
    }

    /// Runs the tick if one is due. Missed intervals collapse into a single
    /// tick since the reading comes from the wall clock anyway.
    pub fn tick(&mut self) -> Option<TimerTick> {
        let now = self.clock.now_ms();
        let running = self.running.as_mut()?;
        if now < running.next_tick_at {
            return None;
        }
        let missed = (now - running.next_tick_at) / self.tick_interval_ms;
        running.next_tick_at += (missed + 1) * self.tick_interval_ms;

        let timer = running.timer;
        if timer.remaining_secs(now) > 0 {
            return Some(TimerTick::Elapsed(timer.elapsed_secs(now)));
        }

        self.running = None;
        if self.time_up_fired {
            return None;
        }
        self.time_up_fired = true;
        info!(target: "timer", "Time is up after {}s", timer.time_limit_secs);
        Some(TimerTick::TimeUp(timer.time_limit_secs))
    }
}

impl EventHandler<GameEngineEvent> for CountdownTimer {
    fn handle_event(&mut self, event: &GameEngineEvent) {
        if let GameEngineEvent::StateChanged(state) = event {
            self.sync(state);
        }
    }
}
