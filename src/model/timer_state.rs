/// Countdown derived from the absolute start time, never from counted ticks,
/// so a suspended host catches up on the next reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerState {
    pub started_at_ms: i64,
    pub time_limit_secs: u32,
}

impl TimerState {
    pub fn new(started_at_ms: i64, time_limit_secs: u32) -> Self {
        Self {
            started_at_ms,
            time_limit_secs,
        }
    }

    pub fn elapsed_secs(&self, now_ms: i64) -> u32 {
        let elapsed_ms = now_ms.saturating_sub(self.started_at_ms).max(0);
        u32::try_from(elapsed_ms / 1000).unwrap_or(u32::MAX)
    }

    pub fn remaining_secs(&self, now_ms: i64) -> i64 {
        i64::from(self.time_limit_secs) - i64::from(self.elapsed_secs(now_ms))
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.remaining_secs(now_ms) <= 0
    }
}
