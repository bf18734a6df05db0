//! Generation-based debouncing
//!
//! Each `schedule` hands out a new token. When the timer fires, only the
//! holder of the latest token does the work; older timers see a stale token
//! and drop out. Nothing is cancelled, superseded timers just become no-ops.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
        }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay.as_millis() as u64
    }

    /// Start a new wait, superseding any pending one. Returns its token.
    pub fn schedule(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Whether `token` is still the latest scheduled wait
    pub fn is_current(&self, token: u64) -> bool {
        token == self.generation
    }
}
