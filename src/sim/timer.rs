//! Round countdown
//!
//! Counts whole seconds. The session fires `tick` once per timer period and
//! stops firing it while paused, so the countdown only tracks remaining time
//! and whether it may tick.

use serde::{Deserialize, Serialize};

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    /// Not running; nothing changed
    Idle,
    /// Decremented, still running
    Ticked(u32),
    /// Reached zero on this tick and stopped
    Expired,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Countdown {
    remaining_secs: u32,
    running: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to `duration_secs` and start ticking
    pub fn start(&mut self, duration_secs: u32) {
        self.remaining_secs = duration_secs;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining_secs
    }

    pub fn tick(&mut self) -> TimerStatus {
        if !self.running {
            return TimerStatus::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            TimerStatus::Expired
        } else {
            TimerStatus::Ticked(self.remaining_secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_expires() {
        let mut timer = Countdown::new();
        timer.start(3);
        assert_eq!(timer.tick(), TimerStatus::Ticked(2));
        assert_eq!(timer.tick(), TimerStatus::Ticked(1));
        assert_eq!(timer.tick(), TimerStatus::Expired);
        assert_eq!(timer.tick(), TimerStatus::Idle);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_stop_keeps_remaining() {
        let mut timer = Countdown::new();
        timer.start(58);
        timer.tick();
        timer.stop();
        assert_eq!(timer.tick(), TimerStatus::Idle);
        assert_eq!(timer.remaining(), 57);
    }

    #[test]
    fn test_restart_resets_duration() {
        let mut timer = Countdown::new();
        timer.start(5);
        timer.tick();
        timer.stop();
        timer.start(15);
        assert_eq!(timer.tick(), TimerStatus::Ticked(14));
    }

    #[test]
    fn test_unstarted_timer_is_idle() {
        let mut timer = Countdown::new();
        assert_eq!(timer.tick(), TimerStatus::Idle);
    }
}
