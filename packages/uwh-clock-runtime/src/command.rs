//! Commands delivered to the engine thread, and the line protocol that
//! produces them.

use serde::Serialize;
use tokio::sync::oneshot;

use uwh_clock_core::config::SettingChange;
use uwh_clock_core::{
    ClockError, EngineSnapshot, EventOutcome, MatchEngine, PenaltyDuration, PenaltyId, Team,
};

use crate::Result;

/// Response sender for commands that want a reply
pub type ResponseSender = oneshot::Sender<Result<CommandReply>>;

/// Inbound event for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    ResetMatch,
    TeamTimeout(Team),
    ToggleRefereeTimeout,
    AddGoal { team: Team, cap: Option<u8> },
    RemoveGoal(Team),
    StartPenalty {
        team: Team,
        cap: u8,
        duration: PenaltyDuration,
    },
    RemovePenalty(PenaltyId),
    StartSiren,
    StopSiren,
    UpdateSetting { key: String, value: String },
    Snapshot,
}

/// What the engine answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reply", content = "value")]
pub enum CommandReply {
    Outcome(EventOutcome),
    Setting { structural: bool },
    Snapshot(Box<EngineSnapshot>),
}

impl From<SettingChange> for CommandReply {
    fn from(change: SettingChange) -> Self {
        CommandReply::Setting {
            structural: change.structural,
        }
    }
}

/// A command plus an optional reply channel.
#[derive(Debug)]
pub struct EngineRequest {
    pub command: EngineCommand,
    pub response: Option<ResponseSender>,
}

impl EngineCommand {
    /// Applies the command to `engine`.
    pub fn apply(self, engine: &mut MatchEngine) -> Result<CommandReply> {
        let outcome = match self {
            EngineCommand::ResetMatch => engine.reset_match(),
            EngineCommand::TeamTimeout(team) => engine.start_team_timeout(team),
            EngineCommand::ToggleRefereeTimeout => engine.toggle_referee_timeout(),
            EngineCommand::AddGoal { team, cap } => engine.add_goal_with_cap(team, cap),
            EngineCommand::RemoveGoal(team) => engine.remove_goal(team),
            EngineCommand::StartPenalty {
                team,
                cap,
                duration,
            } => engine.start_penalty(team, cap, duration),
            EngineCommand::RemovePenalty(id) => engine.remove_penalty(id),
            EngineCommand::StartSiren => engine.start_siren(),
            EngineCommand::StopSiren => engine.stop_siren(),
            EngineCommand::UpdateSetting { key, value } => {
                return engine.update_setting(&key, &value).map(CommandReply::from);
            }
            EngineCommand::Snapshot => {
                return Ok(CommandReply::Snapshot(Box::new(engine.snapshot())));
            }
        };
        Ok(CommandReply::Outcome(outcome))
    }

    /// Parses one line of the text protocol.
    ///
    /// ```text
    /// SIREN_ON | SIREN_OFF
    /// goal <team> [cap]       minus <team>
    /// timeout <team>          ref
    /// penalty <team> <cap> <1|2|5|rom>
    /// unpenalty <id>          reset
    /// set <key> <value>       status
    /// ```
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(ClockError::InvalidCommand("empty line".to_string()));
        };
        let args: Vec<&str> = parts.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("siren_on", []) => EngineCommand::StartSiren,
            ("siren_off", []) => EngineCommand::StopSiren,
            ("reset", []) => EngineCommand::ResetMatch,
            ("ref" | "referee", []) => EngineCommand::ToggleRefereeTimeout,
            ("status", []) => EngineCommand::Snapshot,
            ("timeout", [team]) => EngineCommand::TeamTimeout(team.parse()?),
            ("goal", [team]) => EngineCommand::AddGoal {
                team: team.parse()?,
                cap: None,
            },
            ("goal", [team, cap]) => EngineCommand::AddGoal {
                team: team.parse()?,
                cap: Some(parse_cap(cap)?),
            },
            ("minus", [team]) => EngineCommand::RemoveGoal(team.parse()?),
            ("penalty", [team, cap, duration]) => EngineCommand::StartPenalty {
                team: team.parse()?,
                cap: parse_cap(cap)?,
                duration: duration.parse()?,
            },
            ("unpenalty", [id]) => {
                let id = id
                    .trim_start_matches('#')
                    .parse::<u32>()
                    .map_err(|_| ClockError::InvalidCommand(format!("bad penalty id '{}'", id)))?;
                EngineCommand::RemovePenalty(PenaltyId(id))
            }
            ("set", [key, value @ ..]) if !value.is_empty() => EngineCommand::UpdateSetting {
                key: key.to_string(),
                value: value.join(" "),
            },
            _ => {
                return Err(ClockError::InvalidCommand(format!(
                    "unrecognized command '{}'",
                    line.trim()
                )))
            }
        };
        Ok(command)
    }
}

fn parse_cap(raw: &str) -> Result<u8> {
    raw.parse::<u8>()
        .map_err(|_| ClockError::InvalidCommand(format!("bad cap number '{}'", raw)))
}
