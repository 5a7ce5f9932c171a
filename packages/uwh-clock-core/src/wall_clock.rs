//! Local wall-clock sources.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;

/// Source of local wall-clock time.
pub trait WallClock: Send {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Wall clock set by hand, for tests and replays.
///
/// Clones share the same time so a test can keep one and hand another to the
/// engine.
#[derive(Debug, Clone)]
pub struct ManualWallClock {
    current: Arc<Mutex<NaiveDateTime>>,
}

impl ManualWallClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, time: NaiveDateTime) {
        *self.current.lock() = time;
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut current = self.current.lock();
        *current += chrono::Duration::seconds(secs);
    }
}

impl WallClock for ManualWallClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock()
    }
}
