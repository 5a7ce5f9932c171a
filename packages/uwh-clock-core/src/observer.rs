//! Outbound notifications.
//!
//! Display, sound and persistence subscribe to the engine through
//! [`MatchObserver`]. The engine never reads anything back from an observer.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::outcome::IgnoredReason;
use crate::penalty::PenaltyBoard;
use crate::results::MatchRecord;
use crate::team::Scores;

/// Receives engine side effects. Every method defaults to a no-op.
pub trait MatchObserver: Send {
    fn on_period_changed(&mut self, _name: &str, _is_pause_type: bool) {}

    /// Seconds remaining, or elapsed for count-up clocks.
    fn on_clock_tick(&mut self, _value: i64) {}

    /// Court time as `HH:MM:SS`.
    fn on_court_time_tick(&mut self, _formatted: &str) {}

    fn on_pip_due(&mut self) {}

    fn on_siren_due(&mut self) {}

    fn on_penalty_display_update(&mut self, _board: &PenaltyBoard) {}

    fn on_match_complete(&mut self, _record: &MatchRecord) {}

    fn on_score_changed(&mut self, _scores: Scores) {}

    /// A request was a no-op; feedback for the match official.
    fn on_request_ignored(&mut self, _reason: IgnoredReason) {}

    fn on_wireless_siren(&mut self, _active: bool) {}
}

/// One recorded observer call.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    PeriodChanged { name: String, is_pause_type: bool },
    ClockTick(i64),
    CourtTimeTick(String),
    PipDue,
    SirenDue,
    PenaltyDisplay(PenaltyBoard),
    MatchComplete(MatchRecord),
    ScoreChanged(Scores),
    RequestIgnored(IgnoredReason),
    WirelessSiren(bool),
}

/// Collects notifications into a shared list.
///
/// Clones share the list, so a test can keep one and give the other to the
/// engine.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    /// Returns and clears everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock())
    }

    pub fn count(&self, predicate: impl Fn(&Notification) -> bool) -> usize {
        self.notifications.lock().iter().filter(|n| predicate(n)).count()
    }

    /// Period names in the order they were entered.
    pub fn periods(&self) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .filter_map(|n| match n {
                Notification::PeriodChanged { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_clock_value(&self) -> Option<i64> {
        self.notifications.lock().iter().rev().find_map(|n| match n {
            Notification::ClockTick(value) => Some(*value),
            _ => None,
        })
    }

    fn push(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

impl MatchObserver for RecordingObserver {
    fn on_period_changed(&mut self, name: &str, is_pause_type: bool) {
        self.push(Notification::PeriodChanged {
            name: name.to_string(),
            is_pause_type,
        });
    }

    fn on_clock_tick(&mut self, value: i64) {
        self.push(Notification::ClockTick(value));
    }

    fn on_court_time_tick(&mut self, formatted: &str) {
        self.push(Notification::CourtTimeTick(formatted.to_string()));
    }

    fn on_pip_due(&mut self) {
        self.push(Notification::PipDue);
    }

    fn on_siren_due(&mut self) {
        self.push(Notification::SirenDue);
    }

    fn on_penalty_display_update(&mut self, board: &PenaltyBoard) {
        self.push(Notification::PenaltyDisplay(board.clone()));
    }

    fn on_match_complete(&mut self, record: &MatchRecord) {
        self.push(Notification::MatchComplete(record.clone()));
    }

    fn on_score_changed(&mut self, scores: Scores) {
        self.push(Notification::ScoreChanged(scores));
    }

    fn on_request_ignored(&mut self, reason: IgnoredReason) {
        self.push(Notification::RequestIgnored(reason));
    }

    fn on_wireless_siren(&mut self, active: bool) {
        self.push(Notification::WirelessSiren(active));
    }
}

/// Logs every notification. Used by the server when no display is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn on_period_changed(&mut self, name: &str, is_pause_type: bool) {
        info!(period = name, is_pause_type, "Period changed");
    }

    fn on_clock_tick(&mut self, value: i64) {
        debug!(value, "Clock");
    }

    fn on_court_time_tick(&mut self, formatted: &str) {
        debug!(court_time = formatted, "Court time");
    }

    fn on_pip_due(&mut self) {
        debug!("Pip");
    }

    fn on_siren_due(&mut self) {
        info!("Siren");
    }

    fn on_penalty_display_update(&mut self, board: &PenaltyBoard) {
        debug!(
            white = board.white.len(),
            black = board.black.len(),
            "Penalty board updated"
        );
    }

    fn on_match_complete(&mut self, record: &MatchRecord) {
        info!(
            game = record.game_number,
            white = record.scores.white,
            black = record.scores.black,
            "Match complete"
        );
    }

    fn on_score_changed(&mut self, scores: Scores) {
        info!(white = scores.white, black = scores.black, "Score");
    }

    fn on_request_ignored(&mut self, reason: IgnoredReason) {
        warn!("Request ignored: {}", reason);
    }

    fn on_wireless_siren(&mut self, active: bool) {
        info!(active, "Wireless siren");
    }
}
