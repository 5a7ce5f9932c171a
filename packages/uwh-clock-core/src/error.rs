//! Clock engine error types.

use thiserror::Error;

/// Errors surfaced by configuration, persistence and the runtime plumbing.
///
/// Logical no-ops (a time-out with none remaining, removing a goal at zero)
/// are not errors; see [`crate::outcome::EventOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Setting value could not be parsed or is out of range
    #[error("Invalid value '{value}' for setting '{key}': {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },

    /// Setting name is not known
    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),

    /// Crib time would shorten the between-game break below the floor
    #[error("Crib time {crib_seconds}s leaves {break_seconds}s between-game break with no more than 31s")]
    CribTimeTooLarge {
        break_seconds: u32,
        crib_seconds: u32,
    },

    /// Absolute start time is not `HH:MM`
    #[error("Invalid start time '{0}', expected HH:MM")]
    InvalidStartTime(String),

    /// I/O error while reading or writing files
    #[error("I/O error: {0}")]
    Io(String),

    /// Settings serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Results CSV error
    #[error("CSV error: {0}")]
    Csv(String),

    /// Command channel closed by the runtime
    #[error("Engine command channel closed")]
    ChannelClosed,

    /// Command line could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl ClockError {
    pub(crate) fn invalid_setting(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ClockError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for clock operations.
pub type Result<T> = std::result::Result<T, ClockError>;
