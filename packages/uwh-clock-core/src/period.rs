//! Period identifiers and kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind tag driving tick flavor and pause rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Regular,
    Overtime,
    SuddenDeath,
    Break,
}

/// Every phase a match sequence can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodId {
    FirstGameStartsIn,
    FirstHalf,
    HalfTime,
    SecondHalf,
    OvertimeGameBreak,
    OvertimeFirstHalf,
    OvertimeHalfTime,
    OvertimeSecondHalf,
    SuddenDeathGameBreak,
    SuddenDeath,
    BetweenGameBreak,
}

impl PeriodId {
    pub fn name(self) -> &'static str {
        match self {
            PeriodId::FirstGameStartsIn => "First Game Starts In",
            PeriodId::FirstHalf => "First Half",
            PeriodId::HalfTime => "Half Time",
            PeriodId::SecondHalf => "Second Half",
            PeriodId::OvertimeGameBreak => "Overtime Game Break",
            PeriodId::OvertimeFirstHalf => "Overtime First Half",
            PeriodId::OvertimeHalfTime => "Overtime Half Time",
            PeriodId::OvertimeSecondHalf => "Overtime Second Half",
            PeriodId::SuddenDeathGameBreak => "Sudden Death Game Break",
            PeriodId::SuddenDeath => "Sudden Death",
            PeriodId::BetweenGameBreak => "Between Game Break",
        }
    }

    pub fn kind(self) -> PeriodKind {
        match self {
            PeriodId::FirstHalf | PeriodId::SecondHalf => PeriodKind::Regular,
            PeriodId::OvertimeFirstHalf | PeriodId::OvertimeSecondHalf => PeriodKind::Overtime,
            PeriodId::SuddenDeath => PeriodKind::SuddenDeath,
            PeriodId::FirstGameStartsIn
            | PeriodId::HalfTime
            | PeriodId::OvertimeGameBreak
            | PeriodId::OvertimeHalfTime
            | PeriodId::SuddenDeathGameBreak
            | PeriodId::BetweenGameBreak => PeriodKind::Break,
        }
    }

    /// Penalties and the pip schedule follow this flag.
    pub fn is_pause_type(self) -> bool {
        self.kind() == PeriodKind::Break
    }

    /// Court time stands still through the tie-break part of a match.
    pub fn pauses_court_time(self) -> bool {
        matches!(
            self,
            PeriodId::OvertimeGameBreak
                | PeriodId::OvertimeFirstHalf
                | PeriodId::OvertimeHalfTime
                | PeriodId::OvertimeSecondHalf
                | PeriodId::SuddenDeathGameBreak
                | PeriodId::SuddenDeath
        )
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named phase of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    /// `None` only for sudden death.
    pub duration_seconds: Option<u32>,
}

impl Period {
    pub fn timed(id: PeriodId, duration_seconds: u32) -> Self {
        debug_assert!(id != PeriodId::SuddenDeath);
        Self {
            id,
            duration_seconds: Some(duration_seconds),
        }
    }

    pub fn open_ended(id: PeriodId) -> Self {
        Self {
            id,
            duration_seconds: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn kind(&self) -> PeriodKind {
        self.id.kind()
    }
}
