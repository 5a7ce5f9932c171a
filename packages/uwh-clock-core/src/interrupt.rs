//! Time-outs as save/restore frames over the match clock.
//!
//! A team time-out pushes a frame; a referee time-out pushes another on top of
//! whatever is running, team time-out included. A second team's time-out
//! requested during a running one waits in a single pending slot and starts
//! only when the running time-out expires.

use serde::{Deserialize, Serialize};

use crate::clock::ClockSnapshot;
use crate::outcome::IgnoredReason;
use crate::period::{PeriodId, PeriodKind};
use crate::team::{Team, TeamPair};

/// What the display shows as the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPhase {
    Period(PeriodId),
    TeamTimeout(Team),
    RefereeTimeout,
}

impl DisplayPhase {
    pub fn label(self) -> &'static str {
        match self {
            DisplayPhase::Period(id) => id.name(),
            DisplayPhase::TeamTimeout(Team::White) => "White Team Time-Out",
            DisplayPhase::TeamTimeout(Team::Black) => "Black Team Time-Out",
            DisplayPhase::RefereeTimeout => "Referee Time-Out",
        }
    }

    /// Time-outs and breaks hold penalties.
    pub fn is_pause_type(self) -> bool {
        match self {
            DisplayPhase::Period(id) => id.is_pause_type(),
            DisplayPhase::TeamTimeout(_) | DisplayPhase::RefereeTimeout => true,
        }
    }
}

/// Interrupt kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptKind {
    TeamTimeout(Team),
    RefereeTimeout,
}

/// State saved when an interrupt begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptFrame {
    pub kind: InterruptKind,
    pub saved_clock: ClockSnapshot,
    pub saved_phase: DisplayPhase,
    pub saved_court_time_paused: bool,
}

/// Depth-1 active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptState {
    Normal,
    TeamTimeout(Team),
    RefereeTimeout,
}

/// What to do with a team time-out request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutDecision {
    Start,
    Queue,
    Reject(IgnoredReason),
}

/// Stack of interrupt frames plus time-out bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterruptStack {
    frames: Vec<InterruptFrame>,
    pending_timeout: Option<Team>,
    used_this_half: TeamPair<bool>,
}

impl InterruptStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InterruptState {
        match self.frames.last().map(|f| f.kind) {
            None => InterruptState::Normal,
            Some(InterruptKind::TeamTimeout(team)) => InterruptState::TeamTimeout(team),
            Some(InterruptKind::RefereeTimeout) => InterruptState::RefereeTimeout,
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn top(&self) -> Option<&InterruptFrame> {
        self.frames.last()
    }

    /// Bottom frame, the state saved before any interrupt began.
    pub fn base(&self) -> Option<&InterruptFrame> {
        self.frames.first()
    }

    pub fn push(&mut self, frame: InterruptFrame) {
        debug_assert!(
            !(matches!(frame.kind, InterruptKind::TeamTimeout(_))
                && self.state() == InterruptState::RefereeTimeout),
            "team time-out may not overlay a referee time-out"
        );
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<InterruptFrame> {
        self.frames.pop()
    }

    pub fn pending_timeout(&self) -> Option<Team> {
        self.pending_timeout
    }

    pub fn take_pending_timeout(&mut self) -> Option<Team> {
        self.pending_timeout.take()
    }

    pub fn timeout_used(&self, team: Team) -> bool {
        *self.used_this_half.get(team)
    }

    pub fn mark_timeout_used(&mut self, team: Team) {
        *self.used_this_half.get_mut(team) = true;
    }

    /// New half: each team gets its allotment back.
    pub fn reset_allotments(&mut self) {
        self.used_this_half = TeamPair::default();
    }

    /// Forgets all frames and the pending slot.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.pending_timeout = None;
        self.used_this_half = TeamPair::default();
    }

    /// Decides a team time-out request for `team`.
    ///
    /// `period` is the period underneath any interrupt.
    pub fn decide_team_timeout(
        &self,
        team: Team,
        timeouts_allowed: bool,
        period: PeriodId,
    ) -> TimeoutDecision {
        match self.state() {
            InterruptState::RefereeTimeout => {
                TimeoutDecision::Reject(IgnoredReason::RefereeTimeoutActive)
            }
            InterruptState::TeamTimeout(running) if running == team => {
                TimeoutDecision::Reject(IgnoredReason::TimeoutAlreadyRunning { team })
            }
            InterruptState::TeamTimeout(_) => {
                if self.pending_timeout.is_some() {
                    TimeoutDecision::Reject(IgnoredReason::TimeoutAlreadyQueued)
                } else if self.timeout_used(team) {
                    TimeoutDecision::Reject(IgnoredReason::NoTimeoutsRemaining { team })
                } else {
                    TimeoutDecision::Queue
                }
            }
            InterruptState::Normal => {
                if !timeouts_allowed {
                    TimeoutDecision::Reject(IgnoredReason::TeamTimeoutsDisabled)
                } else if period.kind() != PeriodKind::Regular {
                    TimeoutDecision::Reject(IgnoredReason::NotInPlayingHalf)
                } else if self.timeout_used(team) {
                    TimeoutDecision::Reject(IgnoredReason::NoTimeoutsRemaining { team })
                } else {
                    TimeoutDecision::Start
                }
            }
        }
    }

    pub fn queue_timeout(&mut self, team: Team) {
        debug_assert!(self.pending_timeout.is_none());
        self.pending_timeout = Some(team);
    }
}
