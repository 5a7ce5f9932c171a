//! The match engine.
//!
//! Owns every piece of match state and is driven from outside: inbound
//! events are method calls, and time moves only through
//! [`MatchEngine::advance_to`], which fires due ticks in deadline order. All
//! side effects leave through [`MatchObserver`]s.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::clock::{ClockMode, ClockSnapshot, MatchClock, SUDDEN_DEATH_START};
use crate::config::{ClockConfig, SettingChange};
use crate::court_time::{crib_adjustment, CourtTime};
use crate::error::Result;
use crate::interrupt::{
    DisplayPhase, InterruptFrame, InterruptKind, InterruptStack, InterruptState, TimeoutDecision,
};
use crate::observer::MatchObserver;
use crate::outcome::{EventOutcome, IgnoredReason};
use crate::penalty::{PenaltyBoard, PenaltyDuration, PenaltyId, PenaltyManager, PenaltyTick};
use crate::period::PeriodId;
use crate::results::{GoalRecord, MatchRecord};
use crate::scheduler::{Scheduler, TickToken, TimerKey};
use crate::sequence::PeriodSequence;
use crate::team::{Scores, Team};
use crate::transition::{
    next_transition, Transition, TransitionContext, TransitionEvent, RESTORE_WINDOW_SECONDS,
};
use crate::wall_clock::WallClock;

const SECOND: Duration = Duration::from_secs(1);

/// Last pip-marked second before the final countdown.
const PIP_WARNING_SECONDS: i64 = 30;
const PIP_FINAL_SECONDS: i64 = 10;

/// Serializable view of the engine for displays and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub period: PeriodId,
    pub phase: DisplayPhase,
    pub phase_label: String,
    pub clock: ClockSnapshot,
    pub scores: Scores,
    pub court_time: String,
    pub court_time_paused: bool,
    pub penalties: PenaltyBoard,
    pub penalties_paused: bool,
    pub interrupt: InterruptState,
    pub pending_timeout: Option<Team>,
    pub game_number: u32,
    pub siren_active: bool,
}

/// Period sequencer and interrupt-aware timer engine.
pub struct MatchEngine {
    config: ClockConfig,
    wall_clock: Box<dyn WallClock>,
    observers: Vec<Box<dyn MatchObserver>>,
    scheduler: Scheduler,
    /// Monotonic time the engine has been advanced to
    now: Duration,
    sequence: PeriodSequence,
    clock: MatchClock,
    phase: DisplayPhase,
    interrupts: InterruptStack,
    penalties: PenaltyManager,
    court_time: CourtTime,
    scores: Scores,
    goals: Vec<GoalRecord>,
    game_number: u32,
    sudden_death_goal_scored: bool,
    sudden_death_restore: Option<i64>,
    /// The finished match was recorded during this between-game break
    match_recorded: bool,
    siren_active: bool,
    started: bool,
}

impl MatchEngine {
    /// Creates an engine. Nothing runs until [`MatchEngine::start`].
    pub fn new(config: ClockConfig, wall_clock: impl WallClock + 'static) -> Result<Self> {
        config.validate()?;
        let wall_now = wall_clock.now();
        let sequence = PeriodSequence::build(&config, wall_now);
        let phase = DisplayPhase::Period(sequence.current().id);
        let game_number = config.first_game_number;
        Ok(Self {
            config,
            wall_clock: Box::new(wall_clock),
            observers: Vec::new(),
            scheduler: Scheduler::new(),
            now: Duration::ZERO,
            sequence,
            clock: MatchClock::default(),
            phase,
            interrupts: InterruptStack::new(),
            penalties: PenaltyManager::new(),
            court_time: CourtTime::synced_to(wall_now),
            scores: Scores::default(),
            goals: Vec::new(),
            game_number,
            sudden_death_goal_scored: false,
            sudden_death_restore: None,
            match_recorded: false,
            siren_active: false,
            started: false,
        })
    }

    pub fn with_observer(mut self, observer: impl MatchObserver + 'static) -> Self {
        self.add_observer(Box::new(observer));
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    /// Starts the first match instance at the current monotonic time.
    pub fn start(&mut self) {
        if self.started {
            debug!("Engine already started");
            return;
        }
        self.started = true;
        self.restart();
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Fires every tick due at or before `elapsed`, earliest first.
    ///
    /// Ticks armed while firing are honored if they fall inside the window.
    /// Going backwards is ignored.
    pub fn advance_to(&mut self, elapsed: Duration) {
        if elapsed < self.now {
            trace!(?elapsed, now = ?self.now, "Ignoring backwards advance");
            return;
        }
        while let Some(deadline) = self.scheduler.next_deadline() {
            if deadline > elapsed {
                break;
            }
            for token in self.scheduler.drain_due(deadline) {
                self.now = self.now.max(token.deadline);
                self.fire(token);
            }
        }
        self.now = elapsed;
    }

    /// Advances by `delta` from the current monotonic time.
    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.now + delta);
    }

    /// Monotonic time the engine has reached.
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    /// Earliest pending tick, for runtimes that sleep until it.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    fn fire(&mut self, token: TickToken) {
        if !self.scheduler.is_current(&token) {
            trace!(key = ?token.key, generation = token.generation, "Dropping stale tick");
            return;
        }
        self.scheduler.complete(&token);
        match token.key {
            TimerKey::MatchClock => self.on_match_clock_tick(token.deadline),
            TimerKey::RefereeTimeout => self.on_referee_tick(token.deadline),
            TimerKey::CourtTime => self.on_court_tick(token.deadline),
            TimerKey::Penalty(id) => self.on_penalty_tick(id, token.deadline),
        }
    }

    /// Cancels any pending tick for `key` and arms a fresh one a second out.
    fn start_timer(&mut self, key: TimerKey) {
        self.scheduler.cancel(key);
        self.scheduler.arm(key, self.now + SECOND);
    }

    fn on_match_clock_tick(&mut self, deadline: Duration) {
        let Some(tick) = self.clock.tick() else {
            return;
        };
        self.emit(|o| o.on_clock_tick(tick.value));

        if self.clock.mode() == ClockMode::Countdown
            && self.phase.is_pause_type()
            && (tick.value == PIP_WARNING_SECONDS || (1..=PIP_FINAL_SECONDS).contains(&tick.value))
        {
            self.emit(|o| o.on_pip_due());
        }

        if self.phase == DisplayPhase::Period(PeriodId::BetweenGameBreak)
            && tick.value == RESTORE_WINDOW_SECONDS
            && !self.match_recorded
        {
            self.complete_match();
        }

        if tick.expired {
            self.emit(|o| o.on_siren_due());
            self.on_countdown_expired();
        } else {
            self.scheduler.arm(TimerKey::MatchClock, deadline + SECOND);
        }
    }

    fn on_referee_tick(&mut self, deadline: Duration) {
        let Some(tick) = self.clock.tick() else {
            return;
        };
        self.emit(|o| o.on_clock_tick(tick.value));
        self.scheduler.arm(TimerKey::RefereeTimeout, deadline + SECOND);
    }

    fn on_court_tick(&mut self, deadline: Duration) {
        if self.court_time.tick() {
            let formatted = self.court_time.formatted();
            self.emit(|o| o.on_court_time_tick(&formatted));
        }
        self.scheduler.arm(TimerKey::CourtTime, deadline + SECOND);
    }

    fn on_penalty_tick(&mut self, id: PenaltyId, deadline: Duration) {
        match self.penalties.tick(id) {
            PenaltyTick::Missing | PenaltyTick::Untimed => {}
            PenaltyTick::Paused => {
                self.scheduler.arm(TimerKey::Penalty(id), deadline + SECOND);
            }
            PenaltyTick::Counting(_) => {
                self.scheduler.arm(TimerKey::Penalty(id), deadline + SECOND);
                self.emit_penalty_board();
            }
            PenaltyTick::Expired => {
                info!(penalty = %id, "Penalty expired");
                self.emit_penalty_board();
            }
        }
    }

    fn on_countdown_expired(&mut self) {
        match self.interrupts.state() {
            InterruptState::TeamTimeout(team) => {
                info!(team = %team, "Team time-out over");
                self.unwind_interrupt();
                if let Some(next) = self.interrupts.take_pending_timeout() {
                    if !self.interrupts.timeout_used(next) {
                        self.begin_team_timeout(next);
                    }
                }
            }
            InterruptState::RefereeTimeout => {
                // The referee clock counts up and never expires.
                warn!("Countdown expired under a referee time-out");
            }
            InterruptState::Normal => {
                self.apply_transition(TransitionEvent::Expired);
            }
        }
    }

    // ------------------------------------------------------------------
    // Periods
    // ------------------------------------------------------------------

    fn restart(&mut self) {
        self.scheduler.clear();
        let wall_now = self.wall_clock.now();
        self.sequence = PeriodSequence::build(&self.config, wall_now);
        self.court_time = CourtTime::synced_to(wall_now);
        self.interrupts.clear();
        self.penalties.clear();
        self.scores = Scores::default();
        self.goals.clear();
        self.sudden_death_goal_scored = false;
        self.sudden_death_restore = None;
        self.match_recorded = false;

        info!(
            game = self.game_number,
            periods = self.sequence.len(),
            court_time = %self.court_time.formatted(),
            "Match started"
        );
        self.start_timer(TimerKey::CourtTime);
        self.emit(|o| o.on_score_changed(Scores::default()));
        self.emit_penalty_board();
        self.enter_period(0);
    }

    fn enter_period(&mut self, index: usize) {
        self.sequence.set_index(index);
        let id = self.sequence.current().id;

        match id {
            PeriodId::BetweenGameBreak => self.fit_between_game_break(),
            PeriodId::FirstHalf | PeriodId::SecondHalf => self.interrupts.reset_allotments(),
            PeriodId::SuddenDeath => {
                self.sudden_death_goal_scored = false;
                self.sudden_death_restore = None;
            }
            _ => {}
        }

        self.clock = match self.sequence.current().duration_seconds {
            Some(seconds) => MatchClock::countdown(seconds),
            None => MatchClock::count_up(SUDDEN_DEATH_START),
        };
        self.begin_period_clock(id);
    }

    /// Shows `id` with the clock already set and starts ticking.
    fn begin_period_clock(&mut self, id: PeriodId) {
        self.phase = DisplayPhase::Period(id);
        self.penalties.set_paused(id.is_pause_type());
        self.court_time.set_paused(id.pauses_court_time());
        self.scheduler.cancel(TimerKey::RefereeTimeout);
        self.start_timer(TimerKey::MatchClock);

        info!(period = %id, clock = self.clock.value(), "Period started");
        self.emit_phase();
    }

    fn fit_between_game_break(&mut self) {
        let configured = self.config.between_game_break_seconds();
        let drift = self.court_time.drift_behind(self.wall_clock.now());
        let adjustment = crib_adjustment(configured, self.config.crib_time_seconds, drift);
        self.sequence
            .set_between_game_break_seconds(adjustment.break_seconds);
        self.match_recorded = false;
        if adjustment.shortened_by > 0 {
            self.court_time.catch_up(adjustment.shortened_by);
            info!(
                drift,
                shortened_by = adjustment.shortened_by,
                break_seconds = adjustment.break_seconds,
                "Between game break shortened by crib time"
            );
        }
    }

    fn transition_context(&self) -> TransitionContext {
        TransitionContext {
            scores: self.scores,
            overtime_enabled: self.sequence.contains(PeriodId::OvertimeGameBreak),
            sudden_death_enabled: self.sequence.contains(PeriodId::SuddenDeathGameBreak),
            sudden_death_goal_scored: self.sudden_death_goal_scored,
            sudden_death_restore: self.sudden_death_restore,
            remaining_seconds: self.clock.value(),
        }
    }

    fn apply_transition(&mut self, event: TransitionEvent) {
        let current = self.sequence.current().id;
        if current == PeriodId::BetweenGameBreak
            && self.match_recorded
            && event != TransitionEvent::Expired
        {
            // Goals after the result was recorded belong to the next match.
            return;
        }
        let transition = next_transition(current, event, &self.transition_context());
        debug!(period = %current, ?event, ?transition, "Transition");

        match transition {
            Transition::Stay => {}
            Transition::Advance => {
                if current == PeriodId::SuddenDeath && event == TransitionEvent::GoalAdded {
                    self.sudden_death_goal_scored = true;
                    self.sudden_death_restore = Some(self.clock.value());
                    self.clock.stop();
                    self.scheduler.cancel(TimerKey::MatchClock);
                    info!(elapsed = self.clock.value(), "Sudden death decided");
                    self.emit(|o| o.on_siren_due());
                }
                let next = self.sequence.next_index();
                self.enter_period(next);
            }
            Transition::JumpTo(id) => match self.sequence.index_of(id) {
                Some(index) => self.enter_period(index),
                None => warn!(period = %id, "Transition target not in sequence"),
            },
            Transition::RestoreSuddenDeath { elapsed } => self.restore_sudden_death(elapsed),
        }
    }

    fn restore_sudden_death(&mut self, elapsed: i64) {
        let Some(index) = self.sequence.index_of(PeriodId::SuddenDeath) else {
            warn!("Sudden death restore requested without a sudden death period");
            return;
        };
        info!(elapsed, "Restoring sudden death");
        self.sequence.set_index(index);
        self.sudden_death_goal_scored = false;
        self.sudden_death_restore = None;
        self.clock = MatchClock::count_up(elapsed);
        self.begin_period_clock(PeriodId::SuddenDeath);
    }

    /// Jumps straight to `id`, dropping any running interrupt.
    ///
    /// Returns false if the period is not part of the current sequence.
    pub fn jump_to_period(&mut self, id: PeriodId) -> bool {
        let Some(index) = self.sequence.index_of(id) else {
            return false;
        };
        if !self.interrupts.is_empty() {
            debug!("Dropping interrupts for manual period change");
            self.interrupts.clear();
        }
        self.enter_period(index);
        true
    }

    fn complete_match(&mut self) {
        self.match_recorded = true;
        let record = MatchRecord {
            game_number: self.game_number,
            finished_at: self.wall_clock.now(),
            scores: self.scores,
            penalties: self.penalties.stored().to_vec(),
            goals: std::mem::take(&mut self.goals),
        };
        info!(
            game = record.game_number,
            white = record.scores.white,
            black = record.scores.black,
            "Match complete"
        );

        self.scheduler.cancel_penalties();
        self.penalties.clear();
        self.scores = Scores::default();
        self.sudden_death_restore = None;
        self.sudden_death_goal_scored = false;
        self.game_number += 1;

        self.emit(|o| o.on_match_complete(&record));
        self.emit(|o| o.on_score_changed(Scores::default()));
        self.emit_penalty_board();
    }

    // ------------------------------------------------------------------
    // Interrupts
    // ------------------------------------------------------------------

    fn save_frame(&self, kind: InterruptKind) -> InterruptFrame {
        InterruptFrame {
            kind,
            saved_clock: self.clock.snapshot(),
            saved_phase: self.phase,
            saved_court_time_paused: self.court_time.is_paused(),
        }
    }

    fn begin_team_timeout(&mut self, team: Team) {
        let frame = self.save_frame(InterruptKind::TeamTimeout(team));
        self.interrupts.push(frame);
        self.interrupts.mark_timeout_used(team);

        self.clock = MatchClock::countdown(self.config.team_timeout_seconds());
        self.phase = DisplayPhase::TeamTimeout(team);
        self.penalties.set_paused(true);
        self.court_time.set_paused(true);
        self.start_timer(TimerKey::MatchClock);

        info!(team = %team, seconds = self.clock.value(), "Team time-out started");
        self.emit_phase();
    }

    fn begin_referee_timeout(&mut self) {
        let frame = self.save_frame(InterruptKind::RefereeTimeout);
        self.interrupts.push(frame);

        self.scheduler.cancel(TimerKey::MatchClock);
        self.clock = MatchClock::count_up(0);
        self.phase = DisplayPhase::RefereeTimeout;
        self.penalties.set_paused(true);
        self.court_time.set_paused(true);
        self.start_timer(TimerKey::RefereeTimeout);

        info!(depth = self.interrupts.depth(), "Referee time-out started");
        self.emit_phase();
    }

    /// Pops the top frame and resumes exactly what it saved.
    fn unwind_interrupt(&mut self) {
        let Some(frame) = self.interrupts.pop() else {
            return;
        };
        self.scheduler.cancel(TimerKey::RefereeTimeout);
        self.scheduler.cancel(TimerKey::MatchClock);

        self.clock = MatchClock::restore(frame.saved_clock);
        self.phase = frame.saved_phase;
        self.court_time.set_paused(frame.saved_court_time_paused);
        let period_pauses = self.sequence.current().id.is_pause_type();
        self.penalties
            .set_paused(!self.interrupts.is_empty() || period_pauses);
        if self.clock.is_running() {
            self.start_timer(TimerKey::MatchClock);
        }

        debug!(phase = self.phase.label(), clock = self.clock.value(), "Interrupt unwound");
        self.emit_phase();

        // Sudden death starts level, so a lead on resuming means a goal
        // went in during the interrupt.
        if self.interrupts.is_empty()
            && self.sequence.current().id == PeriodId::SuddenDeath
            && !self.sudden_death_goal_scored
            && !self.scores.is_tied()
        {
            self.apply_transition(TransitionEvent::GoalAdded);
        }
    }

    // ------------------------------------------------------------------
    // Inbound events
    // ------------------------------------------------------------------

    /// Rebuilds the sequence and restarts from `First Game Starts In`.
    pub fn reset_match(&mut self) -> EventOutcome {
        info!("Match reset");
        self.started = true;
        self.restart();
        EventOutcome::Applied
    }

    pub fn start_white_timeout(&mut self) -> EventOutcome {
        self.start_team_timeout(Team::White)
    }

    pub fn start_black_timeout(&mut self) -> EventOutcome {
        self.start_team_timeout(Team::Black)
    }

    pub fn start_team_timeout(&mut self, team: Team) -> EventOutcome {
        let period = self.sequence.current().id;
        match self
            .interrupts
            .decide_team_timeout(team, self.config.team_timeouts_allowed, period)
        {
            TimeoutDecision::Start => {
                self.begin_team_timeout(team);
                EventOutcome::Applied
            }
            TimeoutDecision::Queue => {
                info!(team = %team, "Team time-out queued");
                self.interrupts.queue_timeout(team);
                EventOutcome::Queued
            }
            TimeoutDecision::Reject(reason) => self.ignore(reason),
        }
    }

    /// First press starts a referee time-out, second press ends it.
    pub fn toggle_referee_timeout(&mut self) -> EventOutcome {
        if self.interrupts.state() == InterruptState::RefereeTimeout {
            info!("Referee time-out over");
            self.unwind_interrupt();
        } else {
            self.begin_referee_timeout();
        }
        EventOutcome::Applied
    }

    pub fn add_goal(&mut self, team: Team) -> EventOutcome {
        self.add_goal_with_cap(team, None)
    }

    /// Records a goal. The cap number is kept only when cap-number recording
    /// is enabled.
    pub fn add_goal_with_cap(&mut self, team: Team, cap: Option<u8>) -> EventOutcome {
        let period = self.sequence.current().id;
        let clock_value = self.period_clock_value();
        let cap = cap.filter(|_| self.config.record_cap_numbers);
        *self.scores.get_mut(team) += 1;
        self.goals.push(GoalRecord {
            team,
            cap,
            period,
            clock_value,
        });
        let scores = self.scores;
        info!(team = %team, white = scores.white, black = scores.black, "Goal");
        self.emit(|o| o.on_score_changed(scores));

        if !self.interrupts.is_empty() {
            if period == PeriodId::SuddenDeath {
                debug!("Sudden death goal settled when the interrupt ends");
            }
            return EventOutcome::Applied;
        }
        self.apply_transition(TransitionEvent::GoalAdded);
        EventOutcome::Applied
    }

    pub fn remove_goal(&mut self, team: Team) -> EventOutcome {
        if *self.scores.get(team) == 0 {
            return self.ignore(IgnoredReason::ScoreAlreadyZero { team });
        }
        *self.scores.get_mut(team) -= 1;
        if let Some(index) = self.goals.iter().rposition(|g| g.team == team) {
            self.goals.remove(index);
        }
        let scores = self.scores;
        info!(team = %team, white = scores.white, black = scores.black, "Goal removed");
        self.emit(|o| o.on_score_changed(scores));

        if !self.interrupts.is_empty() {
            return EventOutcome::Applied;
        }
        self.apply_transition(TransitionEvent::GoalRemoved);
        EventOutcome::Applied
    }

    /// Penalties can be handed out during play, team time-outs and referee
    /// time-outs, but not during breaks.
    pub fn penalties_available(&self) -> bool {
        match self.interrupts.state() {
            InterruptState::Normal => !self.sequence.current().id.is_pause_type(),
            InterruptState::TeamTimeout(_) | InterruptState::RefereeTimeout => true,
        }
    }

    pub fn start_penalty(
        &mut self,
        team: Team,
        cap: u8,
        duration: PenaltyDuration,
    ) -> EventOutcome {
        if !self.penalties_available() {
            return self.ignore(IgnoredReason::PenaltiesUnavailable);
        }
        let Some(id) = self.penalties.add(team, cap, duration) else {
            return self.ignore(IgnoredReason::PenaltyLimitReached);
        };
        if duration.seconds().is_some() {
            self.start_timer(TimerKey::Penalty(id));
        }
        info!(penalty = %id, team = %team, cap, duration = duration.label(), "Penalty started");
        self.emit_penalty_board();
        EventOutcome::PenaltyStarted { id }
    }

    pub fn remove_penalty(&mut self, id: PenaltyId) -> EventOutcome {
        if self.penalties.remove(id).is_none() {
            return self.ignore(IgnoredReason::UnknownPenalty { id });
        }
        self.scheduler.cancel(TimerKey::Penalty(id));
        info!(penalty = %id, "Penalty removed");
        self.emit_penalty_board();
        EventOutcome::Applied
    }

    /// Wireless siren on. Safe to call from the button listener.
    pub fn start_siren(&mut self) -> EventOutcome {
        if self.siren_active {
            return self.ignore(IgnoredReason::SirenAlreadyActive);
        }
        self.siren_active = true;
        debug!("Wireless siren on");
        self.emit(|o| o.on_wireless_siren(true));
        EventOutcome::Applied
    }

    pub fn stop_siren(&mut self) -> EventOutcome {
        if !self.siren_active {
            return self.ignore(IgnoredReason::SirenNotActive);
        }
        self.siren_active = false;
        debug!("Wireless siren off");
        self.emit(|o| o.on_wireless_siren(false));
        EventOutcome::Applied
    }

    /// Applies one setting edit. On error nothing changes.
    ///
    /// Structural changes rebuild the sequence and restart the match.
    pub fn update_setting(&mut self, key: &str, raw: &str) -> Result<SettingChange> {
        let change = self.config.apply_setting(key, raw)?;
        info!(key, value = raw, structural = change.structural, "Setting updated");
        if change.structural && self.started {
            self.restart();
        }
        if key == "first_game_number" {
            self.game_number = self.config.first_game_number;
        }
        Ok(change)
    }

    fn ignore(&mut self, reason: IgnoredReason) -> EventOutcome {
        warn!("Ignoring request: {}", reason);
        self.emit(|o| o.on_request_ignored(reason));
        EventOutcome::Ignored(reason)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn sequence(&self) -> &PeriodSequence {
        &self.sequence
    }

    pub fn current_period(&self) -> PeriodId {
        self.sequence.current().id
    }

    pub fn phase(&self) -> DisplayPhase {
        self.phase
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn clock_value(&self) -> i64 {
        self.clock.value()
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn goals(&self) -> &[GoalRecord] {
        &self.goals
    }

    pub fn game_number(&self) -> u32 {
        self.game_number
    }

    pub fn interrupt_state(&self) -> InterruptState {
        self.interrupts.state()
    }

    pub fn interrupts(&self) -> &InterruptStack {
        &self.interrupts
    }

    pub fn penalties(&self) -> &PenaltyManager {
        &self.penalties
    }

    pub fn court_time(&self) -> &CourtTime {
        &self.court_time
    }

    pub fn sudden_death_goal_scored(&self) -> bool {
        self.sudden_death_goal_scored
    }

    pub fn siren_active(&self) -> bool {
        self.siren_active
    }

    pub fn is_timer_armed(&self, key: TimerKey) -> bool {
        self.scheduler.is_armed(key)
    }

    pub fn armed_timer_count(&self) -> usize {
        self.scheduler.armed_count()
    }

    /// Period clock value, looking through any interrupt.
    fn period_clock_value(&self) -> i64 {
        self.interrupts
            .base()
            .map(|frame| frame.saved_clock.value)
            .unwrap_or_else(|| self.clock.value())
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            period: self.sequence.current().id,
            phase: self.phase,
            phase_label: self.phase.label().to_string(),
            clock: self.clock.snapshot(),
            scores: self.scores,
            court_time: self.court_time.formatted(),
            court_time_paused: self.court_time.is_paused(),
            penalties: self.penalties.board(),
            penalties_paused: self.penalties.is_paused(),
            interrupt: self.interrupts.state(),
            pending_timeout: self.interrupts.pending_timeout(),
            game_number: self.game_number,
            siren_active: self.siren_active,
        }
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    fn emit(&mut self, mut f: impl FnMut(&mut dyn MatchObserver)) {
        for observer in self.observers.iter_mut() {
            f(observer.as_mut());
        }
    }

    fn emit_phase(&mut self) {
        let label = self.phase.label();
        let is_pause_type = self.phase.is_pause_type();
        let value = self.clock.value();
        self.emit(|o| o.on_period_changed(label, is_pause_type));
        self.emit(|o| o.on_clock_tick(value));
    }

    fn emit_penalty_board(&mut self) {
        let board = self.penalties.board();
        self.emit(|o| o.on_penalty_display_update(&board));
    }
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("now", &self.now)
            .field("period", &self.sequence.current().id)
            .field("phase", &self.phase)
            .field("clock", &self.clock)
            .field("scores", &self.scores)
            .field("interrupts", &self.interrupts.state())
            .field("observers", &self.observers.len())
            .finish()
    }
}
