//! Period sequencing and score-driven branching over whole matches.

use uwh_clock_core::{ClockConfig, EventOutcome, IgnoredReason, Notification, PeriodId, Team};

use super::helpers::{short_config, Harness};

fn with_tie_breaks(overtime: bool, sudden_death: bool) -> ClockConfig {
    ClockConfig {
        overtime_allowed: overtime,
        sudden_death_allowed: sudden_death,
        ..short_config()
    }
}

fn score(h: &mut Harness, white: u32, black: u32) {
    for _ in 0..white {
        h.engine.add_goal(Team::White);
    }
    for _ in 0..black {
        h.engine.add_goal(Team::Black);
    }
}

#[test]
fn test_decided_match_without_tie_breaks_goes_to_between_game_break() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    score(&mut h, 2, 1);
    h.run_until(PeriodId::BetweenGameBreak);

    assert_eq!(
        h.recorder.periods(),
        vec![
            "First Game Starts In",
            "First Half",
            "Half Time",
            "Second Half",
            "Between Game Break"
        ]
    );
    assert_eq!(h.engine.clock_value(), 300);
}

#[test]
fn test_decided_second_half_skips_overtime_and_sudden_death() {
    let mut h = Harness::new(with_tie_breaks(true, true));
    h.run_until(PeriodId::SecondHalf);
    score(&mut h, 2, 1);
    h.finish_period();

    assert_eq!(h.engine.current_period(), PeriodId::BetweenGameBreak);
    let periods = h.recorder.periods();
    assert!(!periods.iter().any(|p| p.contains("Overtime")));
    assert!(!periods.iter().any(|p| p.contains("Sudden Death")));
}

#[test]
fn test_tied_match_plays_overtime() {
    let mut h = Harness::new(with_tie_breaks(true, false));
    h.run_until(PeriodId::FirstHalf);
    score(&mut h, 1, 1);
    h.run_until(PeriodId::BetweenGameBreak);

    assert_eq!(
        h.recorder.periods(),
        vec![
            "First Game Starts In",
            "First Half",
            "Half Time",
            "Second Half",
            "Overtime Game Break",
            "Overtime First Half",
            "Overtime Half Time",
            "Overtime Second Half",
            "Between Game Break"
        ]
    );
}

#[test]
fn test_overtime_winner_skips_sudden_death() {
    let mut h = Harness::new(with_tie_breaks(true, true));
    h.run_until(PeriodId::FirstHalf);
    score(&mut h, 1, 1);
    h.run_until(PeriodId::OvertimeFirstHalf);
    h.engine.add_goal(Team::Black);
    assert_eq!(h.engine.current_period(), PeriodId::OvertimeFirstHalf);
    h.run_until(PeriodId::BetweenGameBreak);

    assert!(!h.recorder.periods().iter().any(|p| p.contains("Sudden Death")));
}

#[test]
fn test_tied_overtime_goes_to_sudden_death() {
    let mut h = Harness::new(with_tie_breaks(true, true));
    h.run_until(PeriodId::OvertimeSecondHalf);
    h.finish_period();
    assert_eq!(h.engine.current_period(), PeriodId::SuddenDeathGameBreak);
    h.finish_period();
    assert_eq!(h.engine.current_period(), PeriodId::SuddenDeath);
    assert_eq!(h.engine.clock_value(), -1);
}

#[test]
fn test_equalizer_in_between_game_break_reopens_overtime() {
    let mut h = Harness::new(with_tie_breaks(true, true));
    h.run_until(PeriodId::SecondHalf);
    score(&mut h, 2, 1);
    h.finish_period();
    h.advance(10);

    h.engine.add_goal(Team::Black);
    assert_eq!(h.engine.current_period(), PeriodId::OvertimeGameBreak);
    assert_eq!(h.engine.clock_value(), 60);
}

#[test]
fn test_equalizer_without_overtime_goes_to_sudden_death_break() {
    let mut h = Harness::new(with_tie_breaks(false, true));
    h.run_until(PeriodId::SecondHalf);
    score(&mut h, 0, 1);
    h.finish_period();
    h.engine.add_goal(Team::White);
    assert_eq!(h.engine.current_period(), PeriodId::SuddenDeathGameBreak);
}

#[test]
fn test_equalizer_without_tie_breaks_stays() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::SecondHalf);
    score(&mut h, 0, 1);
    h.finish_period();
    h.engine.add_goal(Team::White);
    assert_eq!(h.engine.current_period(), PeriodId::BetweenGameBreak);
}

#[test]
fn test_unequalizing_goal_in_overtime_break_skips_to_between_game_break() {
    let mut h = Harness::new(with_tie_breaks(true, true));
    h.run_until(PeriodId::OvertimeGameBreak);
    h.advance(5);
    h.engine.add_goal(Team::White);
    assert_eq!(h.engine.current_period(), PeriodId::BetweenGameBreak);
}

#[test]
fn test_unequalizing_goal_in_sudden_death_break_skips_to_between_game_break() {
    let mut h = Harness::new(with_tie_breaks(false, true));
    h.run_until(PeriodId::SuddenDeathGameBreak);
    h.engine.add_goal(Team::Black);
    assert_eq!(h.engine.current_period(), PeriodId::BetweenGameBreak);
}

#[test]
fn test_between_game_break_records_match_and_wraps() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    score(&mut h, 3, 2);
    h.run_until(PeriodId::BetweenGameBreak);
    assert_eq!(h.engine.game_number(), 1);

    h.advance(269);
    assert_eq!(h.match_records(), 0);
    h.advance(1);
    assert_eq!(h.engine.clock_value(), 30);
    assert_eq!(h.match_records(), 1);
    assert_eq!(h.engine.scores().white, 0);
    assert_eq!(h.engine.scores().black, 0);
    assert_eq!(h.engine.game_number(), 2);

    let record = h
        .recorder
        .notifications()
        .into_iter()
        .find_map(|n| match n {
            Notification::MatchComplete(record) => Some(record),
            _ => None,
        })
        .unwrap();
    assert_eq!(record.game_number, 1);
    assert_eq!(record.scores.white, 3);
    assert_eq!(record.goals.len(), 5);

    h.finish_period();
    assert_eq!(h.engine.current_period(), PeriodId::FirstHalf);
    assert_eq!(h.engine.clock_value(), 60);
    assert_eq!(h.match_records(), 1);
}

#[test]
fn test_goal_after_results_recorded_does_not_reopen_tie_breaks() {
    let mut h = Harness::new(with_tie_breaks(true, true));
    h.run_until(PeriodId::SecondHalf);
    score(&mut h, 1, 0);
    h.finish_period();
    let remaining = h.engine.clock_value() as u64;
    h.advance(remaining - 20);
    assert_eq!(h.match_records(), 1);

    // New match instance: 1-0, then 1-1 must not count as an equalizer.
    h.engine.add_goal(Team::White);
    h.engine.add_goal(Team::Black);
    assert_eq!(h.engine.current_period(), PeriodId::BetweenGameBreak);
}

#[test]
fn test_pips_only_in_break_countdowns() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    h.recorder.take();
    h.finish_period();
    assert_eq!(h.recorder.count(|n| *n == Notification::PipDue), 0);
    assert_eq!(h.recorder.count(|n| *n == Notification::SirenDue), 1);

    h.recorder.take();
    h.finish_period();
    assert_eq!(h.recorder.count(|n| *n == Notification::PipDue), 11);
    assert_eq!(h.recorder.count(|n| *n == Notification::SirenDue), 1);
}

#[test]
fn test_timeouts_only_in_regular_halves() {
    let mut h = Harness::new(with_tie_breaks(true, false));
    assert_eq!(
        h.engine.start_white_timeout(),
        EventOutcome::Ignored(IgnoredReason::NotInPlayingHalf)
    );
    h.run_until(PeriodId::OvertimeFirstHalf);
    assert_eq!(
        h.engine.start_black_timeout(),
        EventOutcome::Ignored(IgnoredReason::NotInPlayingHalf)
    );
}

#[test]
fn test_reset_returns_to_first_game_starts_in() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::SecondHalf);
    score(&mut h, 1, 4);
    assert_eq!(h.engine.reset_match(), EventOutcome::Applied);
    assert_eq!(h.engine.current_period(), PeriodId::FirstGameStartsIn);
    assert_eq!(h.engine.scores().black, 0);
    assert!(h.engine.goals().is_empty());
}
