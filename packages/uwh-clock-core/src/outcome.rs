//! Outcomes of inbound events.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::penalty::PenaltyId;
use crate::team::Team;

/// Why a request was ignored. Shown to the match official as feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum IgnoredReason {
    TeamTimeoutsDisabled,
    NotInPlayingHalf,
    NoTimeoutsRemaining { team: Team },
    TimeoutAlreadyRunning { team: Team },
    TimeoutAlreadyQueued,
    RefereeTimeoutActive,
    ScoreAlreadyZero { team: Team },
    PenaltiesUnavailable,
    PenaltyLimitReached,
    UnknownPenalty { id: PenaltyId },
    SirenAlreadyActive,
    SirenNotActive,
}

impl fmt::Display for IgnoredReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoredReason::TeamTimeoutsDisabled => write!(f, "Team time-outs are disabled"),
            IgnoredReason::NotInPlayingHalf => {
                write!(f, "Team time-outs are only available during a half")
            }
            IgnoredReason::NoTimeoutsRemaining { team } => {
                write!(f, "{} team has already used its time-out this half", team)
            }
            IgnoredReason::TimeoutAlreadyRunning { team } => {
                write!(f, "{} team time-out is already running", team)
            }
            IgnoredReason::TimeoutAlreadyQueued => write!(f, "A time-out is already queued"),
            IgnoredReason::RefereeTimeoutActive => write!(f, "Referee time-out in progress"),
            IgnoredReason::ScoreAlreadyZero { team } => write!(f, "{} score is already zero", team),
            IgnoredReason::PenaltiesUnavailable => {
                write!(f, "Penalties cannot be started during a break")
            }
            IgnoredReason::PenaltyLimitReached => write!(f, "Penalty list is full"),
            IgnoredReason::UnknownPenalty { id } => write!(f, "No penalty {}", id),
            IgnoredReason::SirenAlreadyActive => write!(f, "Siren already sounding"),
            IgnoredReason::SirenNotActive => write!(f, "Siren is not sounding"),
        }
    }
}

/// Result of an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum EventOutcome {
    /// State changed
    Applied,
    /// A team time-out was queued behind the running one
    Queued,
    /// A penalty was started
    PenaltyStarted { id: PenaltyId },
    /// Nothing changed
    Ignored(IgnoredReason),
}

impl EventOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, EventOutcome::Ignored(_))
    }
}
