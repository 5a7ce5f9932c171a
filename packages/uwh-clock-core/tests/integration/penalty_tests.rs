//! Penalty countdowns across periods and interrupts.

use uwh_clock_core::interrupt::DisplayPhase;
use uwh_clock_core::penalty::MAX_STORED_PENALTIES;
use uwh_clock_core::scheduler::TimerKey;
use uwh_clock_core::{EventOutcome, IgnoredReason, PenaltyDuration, PenaltyId, PeriodId, Team};

use super::helpers::{short_config, Harness};

fn started(outcome: EventOutcome) -> PenaltyId {
    match outcome {
        EventOutcome::PenaltyStarted { id } => id,
        other => panic!("penalty not started: {:?}", other),
    }
}

fn remaining(h: &Harness, id: PenaltyId) -> Option<u32> {
    h.engine.penalties().get(id).map(|p| p.seconds_remaining)
}

#[test]
fn test_penalty_counts_down_and_expires() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    let id = started(h.engine.start_penalty(Team::White, 5, PenaltyDuration::OneMinute));
    h.advance(30);
    assert_eq!(remaining(&h, id), Some(30));
    assert_eq!(h.engine.snapshot().penalties.white[0].seconds_remaining, Some(30));

    // Half ends with exactly 30 seconds of play left to serve.
    h.advance(29);
    assert_eq!(remaining(&h, id), Some(1));
    h.advance(1);
    assert_eq!(h.engine.current_period(), PeriodId::HalfTime);
    assert_eq!(remaining(&h, id), None);
    assert!(h.engine.penalties().stored().is_empty());
    assert!(!h.engine.is_timer_armed(TimerKey::Penalty(id)));
}

#[test]
fn test_penalty_held_through_half_time() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    h.advance(30);
    let id = started(h.engine.start_penalty(Team::Black, 9, PenaltyDuration::TwoMinutes));
    h.finish_period();
    assert_eq!(h.engine.current_period(), PeriodId::HalfTime);
    assert_eq!(remaining(&h, id), Some(90));

    h.finish_period();
    assert_eq!(remaining(&h, id), Some(90));
    h.advance(10);
    assert_eq!(remaining(&h, id), Some(80));
}

#[test]
fn test_penalties_held_during_timeouts() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    let a = started(h.engine.start_penalty(Team::White, 1, PenaltyDuration::TwoMinutes));
    let b = started(h.engine.start_penalty(Team::Black, 2, PenaltyDuration::FiveMinutes));
    h.advance(10);

    h.engine.start_black_timeout();
    h.advance(30);
    h.engine.toggle_referee_timeout();
    h.advance(45);
    h.engine.toggle_referee_timeout();
    h.advance(30);
    assert_eq!(remaining(&h, a), Some(110));
    assert_eq!(remaining(&h, b), Some(290));

    h.advance(5);
    assert_eq!(remaining(&h, a), Some(105));
    assert_eq!(remaining(&h, b), Some(285));
}

#[test]
fn test_penalty_started_during_team_timeout_waits_for_play() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    h.engine.start_white_timeout();
    h.advance(10);

    let id = started(h.engine.start_penalty(Team::Black, 6, PenaltyDuration::OneMinute));
    h.advance(50);
    assert_eq!(h.engine.phase(), DisplayPhase::Period(PeriodId::FirstHalf));
    assert_eq!(remaining(&h, id), Some(60));

    h.advance(5);
    assert_eq!(remaining(&h, id), Some(55));
}

#[test]
fn test_rest_of_match_until_removed() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    let id = started(h.engine.start_penalty(Team::White, 3, PenaltyDuration::RestOfMatch));
    assert!(!h.engine.is_timer_armed(TimerKey::Penalty(id)));
    h.advance(45);
    let board = h.engine.snapshot().penalties;
    assert_eq!(board.white[0].seconds_remaining, None);

    assert_eq!(h.engine.remove_penalty(id), EventOutcome::Applied);
    assert!(h.engine.snapshot().penalties.white.is_empty());
    assert_eq!(
        h.engine.remove_penalty(id),
        EventOutcome::Ignored(IgnoredReason::UnknownPenalty { id })
    );
}

#[test]
fn test_removed_penalty_stops_ticking() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    let id = started(h.engine.start_penalty(Team::Black, 11, PenaltyDuration::OneMinute));
    h.advance(5);
    h.engine.remove_penalty(id);
    assert!(!h.engine.is_timer_armed(TimerKey::Penalty(id)));
    h.advance(5);
    assert!(h.engine.penalties().active().is_empty());
}

#[test]
fn test_no_penalties_during_breaks() {
    let mut h = Harness::new(short_config());
    assert_eq!(
        h.engine.start_penalty(Team::White, 1, PenaltyDuration::OneMinute),
        EventOutcome::Ignored(IgnoredReason::PenaltiesUnavailable)
    );
    h.run_until(PeriodId::HalfTime);
    assert!(h
        .engine
        .start_penalty(Team::White, 1, PenaltyDuration::OneMinute)
        .is_ignored());

    // A referee time-out called during the break allows them.
    h.engine.toggle_referee_timeout();
    started(h.engine.start_penalty(Team::White, 1, PenaltyDuration::OneMinute));
}

#[test]
fn test_penalty_storage_limit() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    for cap in 0..MAX_STORED_PENALTIES as u8 {
        started(h.engine.start_penalty(Team::White, cap, PenaltyDuration::FiveMinutes));
    }
    assert_eq!(
        h.engine.start_penalty(Team::Black, 1, PenaltyDuration::OneMinute),
        EventOutcome::Ignored(IgnoredReason::PenaltyLimitReached)
    );
    assert_eq!(h.engine.snapshot().penalties.white.len(), 3);
}

#[test]
fn test_penalties_cleared_when_match_recorded() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::SecondHalf);
    started(h.engine.start_penalty(Team::Black, 4, PenaltyDuration::RestOfMatch));
    h.engine.add_goal(Team::White);
    h.finish_period();
    h.advance(270);
    assert!(h.engine.penalties().active().is_empty());
    assert!(h.engine.penalties().stored().is_empty());
}
