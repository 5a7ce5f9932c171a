//! Court time: a wall-clock-following counter that can be paused.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::MIN_BETWEEN_GAME_BREAK_SECONDS;

const SECONDS_PER_DAY: u32 = 86_400;

/// Seconds since local midnight, advanced once per tick unless paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtTime {
    seconds: u32,
    paused: bool,
}

impl CourtTime {
    /// Court time synchronized to `wall`, running.
    pub fn synced_to(wall: NaiveDateTime) -> Self {
        Self {
            seconds: wall.num_seconds_from_midnight(),
            paused: false,
        }
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Advances one second unless paused. Returns true if it moved.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.seconds = (self.seconds + 1) % SECONDS_PER_DAY;
        true
    }

    /// Moves court time forward by `seconds`.
    pub fn catch_up(&mut self, seconds: u32) {
        self.seconds = (self.seconds + seconds % SECONDS_PER_DAY) % SECONDS_PER_DAY;
    }

    /// How far `wall` is ahead of court time, in seconds (negative if behind).
    ///
    /// Differences are taken across midnight the short way round.
    pub fn drift_behind(&self, wall: NaiveDateTime) -> i64 {
        let day = SECONDS_PER_DAY as i64;
        let mut delta = wall.num_seconds_from_midnight() as i64 - self.seconds as i64;
        if delta > day / 2 {
            delta -= day;
        } else if delta < -day / 2 {
            delta += day;
        }
        delta
    }

    /// `HH:MM:SS`
    pub fn formatted(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.seconds / 3600,
            (self.seconds / 60) % 60,
            self.seconds % 60
        )
    }
}

/// Result of fitting the between-game break to the crib allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CribAdjustment {
    pub break_seconds: u32,
    pub shortened_by: u32,
}

/// Shortens a between-game break by `min(drift, crib)` seconds, never below
/// [`MIN_BETWEEN_GAME_BREAK_SECONDS`].
pub fn crib_adjustment(break_seconds: u32, crib_seconds: u32, drift: i64) -> CribAdjustment {
    let wanted = drift.clamp(0, crib_seconds as i64) as u32;
    let adjusted = break_seconds
        .saturating_sub(wanted)
        .max(MIN_BETWEEN_GAME_BREAK_SECONDS);
    CribAdjustment {
        break_seconds: adjusted,
        shortened_by: break_seconds.saturating_sub(adjusted),
    }
}
