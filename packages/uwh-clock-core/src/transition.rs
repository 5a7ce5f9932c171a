//! Period transition rules.
//!
//! A pure function of `(current period, event)` and the score context. The
//! engine applies the result; nothing here touches timers.

use crate::period::PeriodId;
use crate::team::Scores;

/// Seconds of between-game break that must remain for a sudden-death goal to
/// be rolled back. Also the point at which the finished match is recorded.
pub const RESTORE_WINDOW_SECONDS: i64 = 30;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// Countdown reached zero
    Expired,
    /// A goal was recorded; scores already include it
    GoalAdded,
    /// A goal was removed; scores already exclude it
    GoalRemoved,
}

/// Facts the rules read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionContext {
    pub scores: Scores,
    pub overtime_enabled: bool,
    pub sudden_death_enabled: bool,
    /// A goal has already ended the current sudden death
    pub sudden_death_goal_scored: bool,
    /// Elapsed sudden-death time remembered at the deciding goal
    pub sudden_death_restore: Option<i64>,
    /// Seconds left on the current countdown
    pub remaining_seconds: i64,
}

/// What the engine should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    /// Next sequence index, wrapping to `First Half`
    Advance,
    JumpTo(PeriodId),
    /// Resume sudden death at the remembered elapsed time
    RestoreSuddenDeath { elapsed: i64 },
}

/// Decides the transition for `event` during `current`.
pub fn next_transition(
    current: PeriodId,
    event: TransitionEvent,
    ctx: &TransitionContext,
) -> Transition {
    use PeriodId::*;
    use TransitionEvent::*;

    let tied = ctx.scores.is_tied();
    match (current, event) {
        (SecondHalf | OvertimeSecondHalf, Expired) if !tied => JumpTo(BetweenGameBreak).into(),
        (SuddenDeath, Expired) if ctx.sudden_death_goal_scored => {
            JumpTo(BetweenGameBreak).into()
        }
        (SuddenDeath, GoalAdded) if !ctx.sudden_death_goal_scored => Transition::Advance,
        (BetweenGameBreak, GoalAdded) if tied => {
            if ctx.overtime_enabled {
                JumpTo(OvertimeGameBreak).into()
            } else if ctx.sudden_death_enabled {
                JumpTo(SuddenDeathGameBreak).into()
            } else {
                Transition::Stay
            }
        }
        (OvertimeGameBreak | SuddenDeathGameBreak, GoalAdded | GoalRemoved) if !tied => {
            JumpTo(BetweenGameBreak).into()
        }
        (BetweenGameBreak, GoalRemoved) => match ctx.sudden_death_restore {
            Some(elapsed) if ctx.remaining_seconds > RESTORE_WINDOW_SECONDS => {
                Transition::RestoreSuddenDeath { elapsed }
            }
            _ => Transition::Stay,
        },
        (_, Expired) => Transition::Advance,
        _ => Transition::Stay,
    }
}

struct JumpTo(PeriodId);

impl From<JumpTo> for Transition {
    fn from(jump: JumpTo) -> Self {
        Transition::JumpTo(jump.0)
    }
}
