//! Teams and per-team values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// One of the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    White,
    Black,
}

impl Team {
    pub const BOTH: [Team; 2] = [Team::White, Team::Black];

    /// Returns the opposing team.
    pub fn other(self) -> Team {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::White => "White",
            Team::Black => "Black",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Team {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Team::White),
            "black" | "b" => Ok(Team::Black),
            other => Err(ClockError::InvalidCommand(format!("unknown team '{}'", other))),
        }
    }
}

/// A value held for each team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPair<T> {
    pub white: T,
    pub black: T,
}

impl<T> TeamPair<T> {
    pub fn new(white: T, black: T) -> Self {
        Self { white, black }
    }

    pub fn get(&self, team: Team) -> &T {
        match team {
            Team::White => &self.white,
            Team::Black => &self.black,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::White => &mut self.white,
            Team::Black => &mut self.black,
        }
    }
}

/// Score pair. Mutated only through the engine's goal operations.
pub type Scores = TeamPair<u32>;

impl Scores {
    pub fn is_tied(&self) -> bool {
        self.white == self.black
    }
}
