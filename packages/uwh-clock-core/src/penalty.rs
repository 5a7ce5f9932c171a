//! Penalty countdowns.
//!
//! Each timed penalty ticks on its own schedule; a single shared pause flag
//! gates all of them. Rest-of-match penalties never count down and stay until
//! removed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClockError;
use crate::team::{Team, TeamPair};

/// Most penalties stored at once.
pub const MAX_STORED_PENALTIES: usize = 6;

/// Most penalties shown per team.
pub const MAX_DISPLAYED_PER_TEAM: usize = 3;

/// Identifier handed out when a penalty is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PenaltyId(pub u32);

impl fmt::Display for PenaltyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Penalty duration class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyDuration {
    OneMinute,
    TwoMinutes,
    FiveMinutes,
    RestOfMatch,
}

impl PenaltyDuration {
    /// Countdown length, `None` for rest of match.
    pub fn seconds(self) -> Option<u32> {
        match self {
            PenaltyDuration::OneMinute => Some(60),
            PenaltyDuration::TwoMinutes => Some(120),
            PenaltyDuration::FiveMinutes => Some(300),
            PenaltyDuration::RestOfMatch => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PenaltyDuration::OneMinute => "1 min",
            PenaltyDuration::TwoMinutes => "2 min",
            PenaltyDuration::FiveMinutes => "5 min",
            PenaltyDuration::RestOfMatch => "Rest of Match",
        }
    }
}

impl FromStr for PenaltyDuration {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "1min" => Ok(PenaltyDuration::OneMinute),
            "2" | "2min" => Ok(PenaltyDuration::TwoMinutes),
            "5" | "5min" => Ok(PenaltyDuration::FiveMinutes),
            "rom" | "rest" | "rest_of_match" => Ok(PenaltyDuration::RestOfMatch),
            other => Err(ClockError::InvalidCommand(format!(
                "unknown penalty duration '{}'",
                other
            ))),
        }
    }
}

/// A running penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub id: PenaltyId,
    pub team: Team,
    pub cap: u8,
    pub duration: PenaltyDuration,
    pub seconds_remaining: u32,
}

impl Penalty {
    pub fn is_rest_of_match(&self) -> bool {
        self.duration == PenaltyDuration::RestOfMatch
    }
}

/// Stored copy kept for the post-match export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRecord {
    pub id: PenaltyId,
    pub team: Team,
    pub cap: u8,
    pub duration: PenaltyDuration,
}

/// One displayed penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyView {
    pub id: PenaltyId,
    pub cap: u8,
    /// `None` for rest of match
    pub seconds_remaining: Option<u32>,
}

/// Penalties shown per team, soonest-expiring first.
pub type PenaltyBoard = TeamPair<Vec<PenaltyView>>;

/// Outcome of one penalty tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyTick {
    /// No such penalty (removed since the tick was armed)
    Missing,
    /// Shared pause flag is set
    Paused,
    /// Rest-of-match penalties do not count
    Untimed,
    /// Still counting
    Counting(u32),
    /// Reached zero and was removed
    Expired,
}

/// Owns all penalties and the shared pause flag.
#[derive(Debug, Default)]
pub struct PenaltyManager {
    active: Vec<Penalty>,
    stored: Vec<PenaltyRecord>,
    paused: bool,
    next_id: u32,
}

impl PenaltyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a penalty. Returns `None` when storage is full.
    pub fn add(&mut self, team: Team, cap: u8, duration: PenaltyDuration) -> Option<PenaltyId> {
        if self.stored.len() >= MAX_STORED_PENALTIES {
            return None;
        }
        self.next_id += 1;
        let id = PenaltyId(self.next_id);
        self.active.push(Penalty {
            id,
            team,
            cap,
            duration,
            seconds_remaining: duration.seconds().unwrap_or(0),
        });
        self.stored.push(PenaltyRecord {
            id,
            team,
            cap,
            duration,
        });
        Some(id)
    }

    /// Removes a penalty from both lists.
    pub fn remove(&mut self, id: PenaltyId) -> Option<Penalty> {
        let index = self.active.iter().position(|p| p.id == id)?;
        self.stored.retain(|r| r.id != id);
        Some(self.active.remove(index))
    }

    pub fn get(&self, id: PenaltyId) -> Option<&Penalty> {
        self.active.iter().find(|p| p.id == id)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// One second for penalty `id`, gated by the shared pause flag.
    pub fn tick(&mut self, id: PenaltyId) -> PenaltyTick {
        let paused = self.paused;
        let Some(penalty) = self.active.iter_mut().find(|p| p.id == id) else {
            return PenaltyTick::Missing;
        };
        if penalty.is_rest_of_match() {
            return PenaltyTick::Untimed;
        }
        if paused {
            return PenaltyTick::Paused;
        }
        penalty.seconds_remaining = penalty.seconds_remaining.saturating_sub(1);
        if penalty.seconds_remaining == 0 {
            self.remove(id);
            return PenaltyTick::Expired;
        }
        PenaltyTick::Counting(penalty.seconds_remaining)
    }

    pub fn active(&self) -> &[Penalty] {
        &self.active
    }

    /// Stored list used for the post-match export.
    pub fn stored(&self) -> &[PenaltyRecord] {
        &self.stored
    }

    /// Ids of the penalties that need a tick.
    pub fn timed_ids(&self) -> Vec<PenaltyId> {
        self.active
            .iter()
            .filter(|p| !p.is_rest_of_match())
            .map(|p| p.id)
            .collect()
    }

    /// Drops every penalty, returning the stored records.
    pub fn clear(&mut self) -> Vec<PenaltyRecord> {
        self.active.clear();
        std::mem::take(&mut self.stored)
    }

    /// Up to three penalties per team, ascending time remaining, rest of match
    /// last.
    pub fn board(&self) -> PenaltyBoard {
        let mut board = PenaltyBoard::default();
        for team in Team::BOTH {
            let mut team_penalties: Vec<&Penalty> =
                self.active.iter().filter(|p| p.team == team).collect();
            team_penalties.sort_by_key(|p| (p.is_rest_of_match(), p.seconds_remaining, p.id));
            *board.get_mut(team) = team_penalties
                .into_iter()
                .take(MAX_DISPLAYED_PER_TEAM)
                .map(|p| PenaltyView {
                    id: p.id,
                    cap: p.cap,
                    seconds_remaining: (!p.is_rest_of_match()).then_some(p.seconds_remaining),
                })
                .collect();
        }
        board
    }
}
