//! Team and referee time-outs.

use uwh_clock_core::interrupt::DisplayPhase;
use uwh_clock_core::scheduler::TimerKey;
use uwh_clock_core::{EventOutcome, IgnoredReason, InterruptState, PeriodId, Team};

use super::helpers::{short_config, Harness};

fn in_first_half() -> Harness {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::FirstHalf);
    h.advance(10);
    assert_eq!(h.engine.clock_value(), 50);
    h
}

#[test]
fn test_team_timeout_saves_and_restores_period_clock() {
    let mut h = in_first_half();
    assert_eq!(h.engine.start_white_timeout(), EventOutcome::Applied);
    assert_eq!(h.engine.phase(), DisplayPhase::TeamTimeout(Team::White));
    assert_eq!(h.engine.clock_value(), 60);
    assert!(h.engine.court_time().is_paused());
    assert!(h.engine.penalties().is_paused());

    h.advance(60);
    assert_eq!(h.engine.phase(), DisplayPhase::Period(PeriodId::FirstHalf));
    assert_eq!(h.engine.clock_value(), 50);
    assert!(!h.engine.court_time().is_paused());
    assert!(!h.engine.penalties().is_paused());

    h.advance(1);
    assert_eq!(h.engine.clock_value(), 49);
}

#[test]
fn test_one_timeout_per_team_per_half() {
    let mut h = in_first_half();
    h.engine.start_white_timeout();
    h.advance(60);
    assert_eq!(
        h.engine.start_white_timeout(),
        EventOutcome::Ignored(IgnoredReason::NoTimeoutsRemaining { team: Team::White })
    );
    assert_eq!(h.engine.start_black_timeout(), EventOutcome::Applied);

    h.advance(60);
    h.run_until(PeriodId::SecondHalf);
    assert_eq!(h.engine.start_white_timeout(), EventOutcome::Applied);
}

#[test]
fn test_repeated_request_for_running_timeout_ignored() {
    let mut h = in_first_half();
    h.engine.start_black_timeout();
    assert_eq!(
        h.engine.start_black_timeout(),
        EventOutcome::Ignored(IgnoredReason::TimeoutAlreadyRunning { team: Team::Black })
    );
}

#[test]
fn test_other_team_timeout_queued_until_expiry() {
    let mut h = in_first_half();
    h.engine.start_white_timeout();
    h.advance(20);
    assert_eq!(h.engine.start_black_timeout(), EventOutcome::Queued);
    assert_eq!(h.engine.snapshot().pending_timeout, Some(Team::Black));

    h.advance(40);
    assert_eq!(h.engine.phase(), DisplayPhase::TeamTimeout(Team::Black));
    assert_eq!(h.engine.clock_value(), 60);
    assert_eq!(h.engine.snapshot().pending_timeout, None);

    h.advance(60);
    assert_eq!(h.engine.phase(), DisplayPhase::Period(PeriodId::FirstHalf));
    assert_eq!(h.engine.clock_value(), 50);
}

#[test]
fn test_referee_timeout_during_team_timeout_resumes_exactly() {
    let mut h = in_first_half();
    h.engine.start_white_timeout();
    h.advance(20);
    assert_eq!(h.engine.clock_value(), 40);

    h.engine.toggle_referee_timeout();
    assert_eq!(h.engine.interrupt_state(), InterruptState::RefereeTimeout);
    assert_eq!(h.engine.interrupts().depth(), 2);
    assert_eq!(h.engine.clock_value(), 0);
    h.advance(15);
    assert_eq!(h.engine.clock_value(), 15);
    assert!(!h.engine.is_timer_armed(TimerKey::MatchClock));

    h.engine.toggle_referee_timeout();
    assert_eq!(h.engine.interrupt_state(), InterruptState::TeamTimeout(Team::White));
    assert_eq!(h.engine.clock_value(), 40);
    assert!(h.engine.court_time().is_paused());
    assert!(h.engine.penalties().is_paused());
    assert!(!h.engine.is_timer_armed(TimerKey::RefereeTimeout));

    h.advance(40);
    assert_eq!(h.engine.interrupt_state(), InterruptState::Normal);
    assert_eq!(h.engine.clock_value(), 50);
}

#[test]
fn test_referee_timeout_does_not_consume_pending_timeout() {
    let mut h = in_first_half();
    h.engine.start_white_timeout();
    h.engine.start_black_timeout();
    h.engine.toggle_referee_timeout();
    h.advance(30);
    h.engine.toggle_referee_timeout();
    assert_eq!(h.engine.interrupt_state(), InterruptState::TeamTimeout(Team::White));
    assert_eq!(h.engine.snapshot().pending_timeout, Some(Team::Black));

    h.advance(60);
    assert_eq!(h.engine.interrupt_state(), InterruptState::TeamTimeout(Team::Black));
}

#[test]
fn test_team_timeout_rejected_under_referee_timeout() {
    let mut h = in_first_half();
    h.engine.toggle_referee_timeout();
    assert_eq!(
        h.engine.start_white_timeout(),
        EventOutcome::Ignored(IgnoredReason::RefereeTimeoutActive)
    );
    assert_eq!(h.engine.interrupts().depth(), 1);
}

#[test]
fn test_referee_timeout_from_any_period() {
    let mut h = Harness::new(short_config());
    h.run_until(PeriodId::HalfTime);
    h.advance(5);
    h.engine.toggle_referee_timeout();
    assert_eq!(h.engine.phase(), DisplayPhase::RefereeTimeout);
    h.advance(100);
    h.engine.toggle_referee_timeout();
    assert_eq!(h.engine.phase(), DisplayPhase::Period(PeriodId::HalfTime));
    assert_eq!(h.engine.clock_value(), 55);
    // Half time is a pause-type period, penalties stay held.
    assert!(h.engine.penalties().is_paused());
}

#[test]
fn test_disabled_team_timeouts() {
    let mut h = Harness::new(short_config());
    h.engine.update_setting("team_timeouts_allowed", "false").unwrap();
    h.run_until(PeriodId::FirstHalf);
    assert_eq!(
        h.engine.start_white_timeout(),
        EventOutcome::Ignored(IgnoredReason::TeamTimeoutsDisabled)
    );
}

#[test]
fn test_goal_during_timeout_only_changes_score() {
    let mut h = in_first_half();
    h.engine.start_white_timeout();
    h.engine.add_goal(Team::White);
    assert_eq!(h.engine.scores().white, 1);
    assert_eq!(h.engine.phase(), DisplayPhase::TeamTimeout(Team::White));
    let goal = &h.engine.goals()[0];
    assert_eq!(goal.period, PeriodId::FirstHalf);
    assert_eq!(goal.clock_value, 50);
}
