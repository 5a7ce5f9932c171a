//! Tick-based runtime for the match engine.
//!
//! A [`Runtime`] owns the [`MatchEngine`](uwh_clock_core::MatchEngine) on one
//! thread. Other threads hold [`EngineHandle`]s and send [`EngineCommand`]s
//! over a bounded channel; the runtime applies them at the start of each tick
//! and then fires whatever engine timers have come due.

pub mod command;
pub mod handle;
pub mod listener;
pub mod runtime;
pub mod tick_phases;

pub use command::{CommandReply, EngineCommand, EngineRequest, ResponseSender};
pub use handle::{EngineHandle, SharedSnapshot};
pub use listener::{spawn_listener, LineListener, LineOutcome, ListenerStats};
pub use runtime::Runtime;
pub use tick_phases::{TickPhase, TickPhaseProcessor};

use uwh_clock_core::ClockError;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, ClockError>;
