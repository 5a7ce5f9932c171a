//! Period sequence for one match instance.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::ClockConfig;
use crate::period::{Period, PeriodId};

/// Ordered periods plus the index of the active one.
///
/// Advancing past the last period loops to `First Half`; an index past the
/// end is normalized to the `Between Game Break`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSequence {
    periods: Vec<Period>,
    current_index: usize,
}

impl PeriodSequence {
    /// Builds the sequence from configuration, computing "First Game Starts
    /// In" relative to `now`.
    pub fn build(config: &ClockConfig, now: NaiveDateTime) -> Self {
        let mut periods = vec![
            Period::timed(
                PeriodId::FirstGameStartsIn,
                config.first_game_starts_in_seconds(now),
            ),
            Period::timed(PeriodId::FirstHalf, config.half_period_seconds()),
            Period::timed(PeriodId::HalfTime, config.half_time_break_seconds()),
            Period::timed(PeriodId::SecondHalf, config.half_period_seconds()),
        ];
        if config.overtime_allowed {
            periods.extend([
                Period::timed(
                    PeriodId::OvertimeGameBreak,
                    config.overtime_game_break_seconds(),
                ),
                Period::timed(
                    PeriodId::OvertimeFirstHalf,
                    config.overtime_half_period_seconds(),
                ),
                Period::timed(
                    PeriodId::OvertimeHalfTime,
                    config.overtime_half_time_break_seconds(),
                ),
                Period::timed(
                    PeriodId::OvertimeSecondHalf,
                    config.overtime_half_period_seconds(),
                ),
            ]);
        }
        if config.sudden_death_allowed {
            periods.extend([
                Period::timed(
                    PeriodId::SuddenDeathGameBreak,
                    config.sudden_death_game_break_seconds(),
                ),
                Period::open_ended(PeriodId::SuddenDeath),
            ]);
        }
        periods.push(Period::timed(
            PeriodId::BetweenGameBreak,
            config.between_game_break_seconds(),
        ));
        Self {
            periods,
            current_index: 0,
        }
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &Period {
        &self.periods[self.current_index]
    }

    pub fn contains(&self, id: PeriodId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: PeriodId) -> Option<usize> {
        self.periods.iter().position(|p| p.id == id)
    }

    /// Sets the active index, normalizing out-of-range values to the
    /// between-game break.
    pub fn set_index(&mut self, index: usize) {
        self.current_index = if index < self.periods.len() {
            index
        } else {
            self.between_game_break_index()
        };
    }

    /// Moves to `id`. Returns false if the sequence does not contain it.
    pub fn jump_to(&mut self, id: PeriodId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.current_index = index;
                true
            }
            None => false,
        }
    }

    /// Index that follows the current one, wrapping past the end to
    /// `First Half`.
    pub fn next_index(&self) -> usize {
        let next = self.current_index + 1;
        if next >= self.periods.len() {
            self.index_of(PeriodId::FirstHalf).unwrap_or(0)
        } else {
            next
        }
    }

    /// Advances and returns the new current period.
    pub fn advance(&mut self) -> &Period {
        self.current_index = self.next_index();
        self.current()
    }

    fn between_game_break_index(&self) -> usize {
        self.periods.len() - 1
    }

    /// Replaces the between-game break duration, the one mutable entry.
    pub fn set_between_game_break_seconds(&mut self, seconds: u32) {
        let index = self.between_game_break_index();
        self.periods[index].duration_seconds = Some(seconds);
    }
}
