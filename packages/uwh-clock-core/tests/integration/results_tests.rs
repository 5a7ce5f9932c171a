//! Results persistence and settings files.

use tempfile::tempdir;

use uwh_clock_core::{
    ClockConfig, CsvResultsObserver, MatchObserver, PenaltyDuration, PeriodId, ResultsLog, Team,
};

use super::helpers::{short_config, Harness};

#[test]
fn test_completed_matches_appended_to_csv() {
    let dir = tempdir().unwrap();
    let log = ResultsLog::open(dir.path().join("results")).unwrap();
    let observers: Vec<Box<dyn MatchObserver>> =
        vec![Box::new(CsvResultsObserver::new(log.clone()))];
    let config = ClockConfig {
        record_cap_numbers: true,
        ..short_config()
    };
    let mut h = Harness::with_observers(config, observers);

    h.run_until(PeriodId::FirstHalf);
    h.engine.add_goal_with_cap(Team::Black, Some(12));
    h.engine
        .start_penalty(Team::White, 6, PenaltyDuration::RestOfMatch);
    h.run_until(PeriodId::BetweenGameBreak);
    h.advance(270);

    let rows = log.read_results().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].game_number, 1);
    assert_eq!(rows[0].white_score, 0);
    assert_eq!(rows[0].black_score, 1);
    assert_eq!(rows[0].scorers, "black:12");
    assert_eq!(rows[0].finished_at, "2026-05-09 09:08:30");

    let penalties = log.read_penalties().unwrap();
    assert_eq!(penalties.len(), 1);
    assert_eq!(penalties[0].cap, 6);
    assert_eq!(penalties[0].team, Team::White);

    // Second match instance gets the next game number.
    h.finish_period();
    h.engine.add_goal(Team::White);
    h.run_until(PeriodId::BetweenGameBreak);
    let remaining = h.engine.clock_value() as u64;
    h.advance(remaining - 30);
    let rows = log.read_results().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].game_number, 2);
    assert_eq!(rows[1].scorers, "white:");
}

#[test]
fn test_cap_numbers_dropped_when_not_recorded() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    h.engine.add_goal_with_cap(Team::White, Some(3));
    assert_eq!(h.engine.goals()[0].cap, None);
}

#[test]
fn test_settings_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let config = ClockConfig {
        overtime_allowed: true,
        start_time: Some("18:30".to_string()),
        ..short_config()
    };
    config.save_to_file(&path).unwrap();

    let loaded = ClockConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(ClockConfig::from_file(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_invalid_settings_file_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"between_game_break_minutes": 0.5, "crib_time_seconds": 60}"#)
        .unwrap();
    assert!(ClockConfig::from_file(&path).is_err());
}
