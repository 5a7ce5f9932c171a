//! Core of the underwater hockey match clock.
//!
//! Provides the period sequence, the interrupt-aware timer engine, penalty
//! countdowns, court time with crib adjustment, and match result logging.

pub mod clock;
pub mod config;
pub mod court_time;
pub mod engine;
pub mod error;
pub mod interrupt;
pub mod observer;
pub mod outcome;
pub mod penalty;
pub mod period;
pub mod results;
pub mod scheduler;
pub mod sequence;
pub mod team;
pub mod transition;
pub mod wall_clock;

pub use config::{ClockConfig, RuntimeConfig, SettingChange};
pub use engine::{EngineSnapshot, MatchEngine};
pub use error::{ClockError, Result};
pub use interrupt::{DisplayPhase, InterruptState};
pub use observer::{MatchObserver, Notification, RecordingObserver, TracingObserver};
pub use outcome::{EventOutcome, IgnoredReason};
pub use penalty::{PenaltyDuration, PenaltyId};
pub use period::{PeriodId, PeriodKind};
pub use results::{CsvResultsObserver, MatchRecord, ResultsLog};
pub use team::{Scores, Team};
pub use wall_clock::{ManualWallClock, SystemWallClock, WallClock};
