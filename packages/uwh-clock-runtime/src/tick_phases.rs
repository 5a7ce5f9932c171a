//! Tick phase handling

use std::time::Instant;

use crate::Result;

/// Runtime tick phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    /// Inbound command processing (up to half the tick)
    Commands,
    /// Due engine timers
    Timers,
}

/// Trait for tick phase processing
pub trait TickPhaseProcessor {
    /// Process a specific tick phase
    fn process_tick_phase(&mut self, phase: TickPhase, tick_start: Instant) -> Result<()>;
}

impl TickPhaseProcessor for crate::Runtime {
    fn process_tick_phase(&mut self, phase: TickPhase, tick_start: Instant) -> Result<()> {
        match phase {
            TickPhase::Commands => self.process_commands_phase(tick_start),
            TickPhase::Timers => self.process_timers_phase(),
        }
    }
}
