//! Shared harness for integration tests.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};

use uwh_clock_core::{
    ClockConfig, ManualWallClock, MatchEngine, MatchObserver, Notification, PeriodId,
    RecordingObserver,
};

pub fn nine_am() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 5, 9)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// One-minute halves and breaks so whole matches run quickly.
pub fn short_config() -> ClockConfig {
    ClockConfig {
        half_period_minutes: 1.0,
        half_time_break_minutes: 1.0,
        team_timeout_minutes: 1.0,
        overtime_game_break_minutes: 1.0,
        overtime_half_period_minutes: 1.0,
        overtime_half_time_break_minutes: 1.0,
        sudden_death_game_break_minutes: 1.0,
        between_game_break_minutes: 5.0,
        crib_time_seconds: 60,
        starts_in_minutes: 1.0,
        ..ClockConfig::default()
    }
}

pub struct Harness {
    pub engine: MatchEngine,
    pub recorder: RecordingObserver,
    pub wall: ManualWallClock,
}

impl Harness {
    pub fn new(config: ClockConfig) -> Self {
        Self::with_observers(config, Vec::new())
    }

    pub fn with_observers(config: ClockConfig, extra: Vec<Box<dyn MatchObserver>>) -> Self {
        let wall = ManualWallClock::new(nine_am());
        let recorder = RecordingObserver::new();
        let mut engine = MatchEngine::new(config, wall.clone())
            .unwrap()
            .with_observer(recorder.clone());
        for observer in extra {
            engine.add_observer(observer);
        }
        engine.start();
        Self {
            engine,
            recorder,
            wall,
        }
    }

    /// Moves wall clock and engine forward together, one second at a time.
    pub fn advance(&mut self, seconds: u64) {
        for _ in 0..seconds {
            self.wall.advance_secs(1);
            self.engine.advance_by(Duration::from_secs(1));
        }
    }

    /// Runs out the current countdown.
    pub fn finish_period(&mut self) {
        let remaining = self.engine.clock_value();
        assert!(remaining >= 0, "finish_period on a count-up clock");
        self.advance(remaining as u64);
    }

    /// Runs periods out until `target` is current.
    pub fn run_until(&mut self, target: PeriodId) {
        for _ in 0..20 {
            if self.engine.current_period() == target {
                return;
            }
            self.finish_period();
        }
        panic!("never reached {:?}", target);
    }

    pub fn match_records(&self) -> usize {
        self.recorder
            .count(|n| matches!(n, Notification::MatchComplete(_)))
    }
}
