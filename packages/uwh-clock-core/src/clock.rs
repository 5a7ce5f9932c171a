//! The single active match clock.

use serde::{Deserialize, Serialize};

/// First value shown by the sudden-death count-up.
pub const SUDDEN_DEATH_START: i64 = -1;

/// Tick flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// Seconds remaining, expires at zero
    Countdown,
    /// Seconds elapsed, open-ended
    CountUp,
}

/// Saved clock state, restored unchanged when an interrupt ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub value: i64,
    pub mode: ClockMode,
    pub running: bool,
}

/// Outcome of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    pub value: i64,
    /// Countdown reached zero on this tick
    pub expired: bool,
}

/// Seconds remaining or elapsed for whatever is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchClock {
    value: i64,
    mode: ClockMode,
    running: bool,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self {
            value: 0,
            mode: ClockMode::Countdown,
            running: false,
        }
    }
}

impl MatchClock {
    /// A running countdown from `seconds`.
    pub fn countdown(seconds: u32) -> Self {
        Self {
            value: seconds as i64,
            mode: ClockMode::Countdown,
            running: true,
        }
    }

    /// A running count-up from `start`.
    pub fn count_up(start: i64) -> Self {
        Self {
            value: start,
            mode: ClockMode::CountUp,
            running: true,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances one second. Returns `None` when stopped.
    pub fn tick(&mut self) -> Option<ClockTick> {
        if !self.running {
            return None;
        }
        let expired = match self.mode {
            ClockMode::Countdown => {
                if self.value > 0 {
                    self.value -= 1;
                }
                self.value == 0
            }
            ClockMode::CountUp => {
                self.value += 1;
                false
            }
        };
        if expired {
            self.running = false;
        }
        Some(ClockTick {
            value: self.value,
            expired,
        })
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            value: self.value,
            mode: self.mode,
            running: self.running,
        }
    }

    pub fn restore(snapshot: ClockSnapshot) -> Self {
        Self {
            value: snapshot.value,
            mode: snapshot.mode,
            running: snapshot.running,
        }
    }
}
