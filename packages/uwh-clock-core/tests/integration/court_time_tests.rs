//! Court time tracking and crib-time catch-up.

use uwh_clock_core::{ClockConfig, PeriodId, Team, WallClock};

use super::helpers::{short_config, Harness};

#[test]
fn test_court_time_follows_wall_clock_during_regular_play() {
    let mut h = Harness::new(short_config());
    h.advance(100);
    assert_eq!(h.engine.court_time().formatted(), "09:01:40");
    assert_eq!(h.engine.court_time().drift_behind(h.wall.now()), 0);
}

#[test]
fn test_crib_time_caps_catch_up() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::SecondHalf);
    h.engine.add_goal(Team::White);
    h.wall.advance_secs(90);
    h.finish_period();

    assert_eq!(h.engine.current_period(), PeriodId::BetweenGameBreak);
    assert_eq!(h.engine.clock_value(), 240);
    assert_eq!(h.engine.court_time().drift_behind(h.wall.now()), 30);
}

#[test]
fn test_small_drift_fully_recovered() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::SecondHalf);
    h.wall.advance_secs(20);
    h.finish_period();
    assert_eq!(h.engine.clock_value(), 280);
    assert_eq!(h.engine.court_time().drift_behind(h.wall.now()), 0);
}

#[test]
fn test_court_time_ahead_of_wall_clock_leaves_break_alone() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::SecondHalf);
    h.wall.advance_secs(-45);
    h.finish_period();
    assert_eq!(h.engine.clock_value(), 300);
}

#[test]
fn test_break_never_below_floor() {
    let config = ClockConfig {
        between_game_break_minutes: 1.0,
        crib_time_seconds: 28,
        ..short_config()
    };
    let mut h = Harness::new(config);
    h.run_until(PeriodId::SecondHalf);
    h.wall.advance_secs(600);
    h.finish_period();
    assert_eq!(h.engine.clock_value(), 32);
}

#[test]
fn test_crib_time_rejected_when_break_too_short() {
    let mut h = Harness::new(short_config());
    let before = h.engine.config().crib_time_seconds;
    assert!(h.engine.update_setting("crib_time", "269").is_err());
    assert_eq!(h.engine.config().crib_time_seconds, before);
    assert!(h.engine.update_setting("crib_time", "268").is_ok());
}

#[test]
fn test_court_time_paused_through_overtime() {
    let config = ClockConfig {
        overtime_allowed: true,
        ..short_config()
    };
    let mut h = Harness::new(config);
    h.run_until(PeriodId::OvertimeGameBreak);
    assert!(h.engine.court_time().is_paused());
    let frozen = h.engine.court_time().seconds();
    h.advance(30);
    assert_eq!(h.engine.court_time().seconds(), frozen);

    // Four one-minute overtime periods: 240s behind, 60s recovered.
    h.run_until(PeriodId::BetweenGameBreak);
    assert!(!h.engine.court_time().is_paused());
    assert_eq!(h.engine.clock_value(), 240);
    assert_eq!(h.engine.court_time().drift_behind(h.wall.now()), 180);
}

#[test]
fn test_reset_resyncs_court_time() {
    let mut h = Harness::new(short_config());
    h.advance(10);
    h.wall.advance_secs(500);
    h.engine.reset_match();
    assert_eq!(h.engine.court_time().drift_behind(h.wall.now()), 0);
}
