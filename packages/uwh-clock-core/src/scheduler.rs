//! One-second tick scheduling with generation tokens.
//!
//! Every logical timer is identified by a [`TimerKey`]. Arming a key hands
//! out a fresh generation; cancelling forgets it. Entries are deleted lazily:
//! a token drained from the queue after its key was cancelled or re-armed is
//! stale and must be dropped by the caller.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::penalty::PenaltyId;

/// Logical timers driven by the engine.
///
/// Declaration order is firing order for ticks sharing a deadline: court time
/// and penalties count a second before the match clock may end the period
/// that pauses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerKey {
    /// Court time
    CourtTime,
    /// An individual penalty countdown
    Penalty(PenaltyId),
    /// Period countdown, sudden-death count-up or team time-out countdown
    MatchClock,
    /// Referee time-out count-up
    RefereeTimeout,
}

/// Handle for one armed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    pub key: TimerKey,
    pub generation: u64,
    pub deadline: Duration,
}

/// Timer queue keyed by [`TimerKey`].
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<(Duration, TimerKey, u64)>>,
    armed: HashMap<TimerKey, u64>,
    next_generation: u64,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `key` to fire at `deadline`.
    ///
    /// The key must not already be armed: callers cancel before re-arming.
    pub fn arm(&mut self, key: TimerKey, deadline: Duration) -> TickToken {
        debug_assert!(
            !self.armed.contains_key(&key),
            "timer {:?} armed twice without cancellation",
            key
        );
        self.next_generation += 1;
        let generation = self.next_generation;
        self.armed.insert(key, generation);
        self.queue.push(Reverse((deadline, key, generation)));
        TickToken {
            key,
            generation,
            deadline,
        }
    }

    /// Cancels `key`. Returns true if it was armed.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.armed.remove(&key).is_some()
    }

    /// Cancels every penalty timer.
    pub fn cancel_penalties(&mut self) {
        self.armed.retain(|key, _| !matches!(key, TimerKey::Penalty(_)));
    }

    /// Cancels everything and empties the queue.
    pub fn clear(&mut self) {
        self.armed.clear();
        self.queue.clear();
    }

    pub fn is_armed(&self, key: TimerKey) -> bool {
        self.armed.contains_key(&key)
    }

    /// True while `token` is the live generation of its key.
    pub fn is_current(&self, token: &TickToken) -> bool {
        self.armed.get(&token.key) == Some(&token.generation)
    }

    /// Marks a current token as fired so its key may be armed again.
    pub fn complete(&mut self, token: &TickToken) {
        if self.is_current(token) {
            self.armed.remove(&token.key);
        }
    }

    /// Removes and returns every queued token due at `now`, earliest first.
    ///
    /// Stale tokens are included; check [`Scheduler::is_current`] before
    /// acting on one.
    pub fn drain_due(&mut self, now: Duration) -> Vec<TickToken> {
        let mut due = Vec::new();
        while let Some(Reverse((deadline, key, generation))) = self.queue.peek().copied() {
            if deadline > now {
                break;
            }
            self.queue.pop();
            due.push(TickToken {
                key,
                generation,
                deadline,
            });
        }
        due
    }

    /// Earliest live deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|Reverse((_, key, generation))| self.armed.get(key) == Some(generation))
            .map(|Reverse((deadline, _, _))| *deadline)
            .min()
    }

    /// Number of live armed timers.
    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Number of queue entries, stale ones included.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }
}
