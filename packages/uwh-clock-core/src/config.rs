//! Match clock configuration.
//!
//! Settings are stored as a JSON file, may be overridden from `UWH_*`
//! environment variables, and can be edited one field at a time with
//! [`ClockConfig::apply_setting`], which validates before committing.

use std::env;
use std::path::Path;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ClockError, Result};

/// Minimum between-game break left after crib time is subtracted.
pub const MIN_BETWEEN_GAME_BREAK_SECONDS: u32 = 32;

/// Floor for the relative "first game starts in" countdown.
pub const MIN_STARTS_IN_SECONDS: u32 = 30;

/// Match clock configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Length of each regular half in minutes
    pub half_period_minutes: f64,
    /// Half time break in minutes
    pub half_time_break_minutes: f64,
    /// Team time-out length in minutes
    pub team_timeout_minutes: f64,
    /// Break before overtime in minutes
    pub overtime_game_break_minutes: f64,
    /// Length of each overtime half in minutes
    pub overtime_half_period_minutes: f64,
    /// Overtime half time break in minutes
    pub overtime_half_time_break_minutes: f64,
    /// Break before sudden death in minutes
    pub sudden_death_game_break_minutes: f64,
    /// Break between consecutive games in minutes
    pub between_game_break_minutes: f64,
    /// Seconds the between-game break may be shortened to catch up with wall-clock
    pub crib_time_seconds: u32,
    /// One time-out per team per half
    pub team_timeouts_allowed: bool,
    /// Play overtime on a tie after the second half
    pub overtime_allowed: bool,
    /// The "used" flag of the sudden death entry
    pub sudden_death_allowed: bool,
    /// Record the scorer's cap number with each goal
    pub record_cap_numbers: bool,
    /// Absolute start time of the first game, `HH:MM` local time
    pub start_time: Option<String>,
    /// Relative start used when no absolute start time is set
    pub starts_in_minutes: f64,
    /// Number given to the first game played
    pub first_game_number: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            half_period_minutes: 15.0,
            half_time_break_minutes: 3.0,
            team_timeout_minutes: 1.0,
            overtime_game_break_minutes: 3.0,
            overtime_half_period_minutes: 5.0,
            overtime_half_time_break_minutes: 1.0,
            sudden_death_game_break_minutes: 1.0,
            between_game_break_minutes: 5.0,
            crib_time_seconds: 60,
            team_timeouts_allowed: true,
            overtime_allowed: false,
            sudden_death_allowed: false,
            record_cap_numbers: false,
            start_time: None,
            starts_in_minutes: 1.0,
            first_game_number: 1,
        }
    }
}

/// What a single setting edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingChange {
    /// The period sequence must be rebuilt
    pub structural: bool,
}

fn minutes_to_seconds(minutes: f64) -> u32 {
    (minutes * 60.0).round() as u32
}

fn parse_minutes(key: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ClockError::invalid_setting(key, raw, "not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ClockError::invalid_setting(key, raw, "must be a non-negative number"));
    }
    Ok(value)
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ClockError::invalid_setting(key, raw, "expected true or false")),
    }
}

fn parse_count(key: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| ClockError::invalid_setting(key, raw, "not a whole number"))
}

/// Parses an `HH:MM` start time.
pub fn parse_start_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ClockError::InvalidStartTime(raw.to_string()))
}

impl ClockConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ClockError::Io(format!("Failed to read settings file: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parses and validates settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClockConfig = serde_json::from_str(json)
            .map_err(|e| ClockError::Serialization(format!("Invalid settings JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the settings as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            ClockError::Serialization(format!("Failed to serialize settings: {}", e))
        })?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| ClockError::Io(format!("Failed to write settings file: {}", e)))?;
        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// Variables are named after the setting keys with a `UWH_` prefix,
    /// e.g. `UWH_HALF_PERIOD=10` or `UWH_CRIB_TIME=45`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        for key in Self::SETTING_KEYS {
            let var = format!("UWH_{}", key.to_ascii_uppercase());
            if let Ok(val) = env::var(&var) {
                self.apply_setting(key, &val)?;
            }
        }
        Ok(())
    }

    /// Names accepted by [`ClockConfig::apply_setting`].
    pub const SETTING_KEYS: [&'static str; 16] = [
        "half_period",
        "half_time_break",
        "team_timeout_period",
        "overtime_game_break",
        "overtime_half_period",
        "overtime_half_time_break",
        "sudden_death_game_break",
        "between_game_break",
        "crib_time",
        "team_timeouts_allowed",
        "overtime_allowed",
        "sudden_death_allowed",
        "record_cap_numbers",
        "start_time",
        "starts_in",
        "first_game_number",
    ];

    /// Applies one textual setting edit.
    ///
    /// The edit is validated against the whole configuration; on error the
    /// previous value is kept and nothing else changes.
    pub fn apply_setting(&mut self, key: &str, raw: &str) -> Result<SettingChange> {
        let mut candidate = self.clone();
        let structural = match key {
            "half_period" => {
                candidate.half_period_minutes = parse_minutes(key, raw)?;
                true
            }
            "half_time_break" => {
                candidate.half_time_break_minutes = parse_minutes(key, raw)?;
                true
            }
            "team_timeout_period" => {
                candidate.team_timeout_minutes = parse_minutes(key, raw)?;
                true
            }
            "overtime_game_break" => {
                candidate.overtime_game_break_minutes = parse_minutes(key, raw)?;
                true
            }
            "overtime_half_period" => {
                candidate.overtime_half_period_minutes = parse_minutes(key, raw)?;
                true
            }
            "overtime_half_time_break" => {
                candidate.overtime_half_time_break_minutes = parse_minutes(key, raw)?;
                true
            }
            "sudden_death_game_break" => {
                candidate.sudden_death_game_break_minutes = parse_minutes(key, raw)?;
                true
            }
            "between_game_break" => {
                candidate.between_game_break_minutes = parse_minutes(key, raw)?;
                true
            }
            "crib_time" => {
                candidate.crib_time_seconds = parse_count(key, raw)?;
                false
            }
            "team_timeouts_allowed" => {
                candidate.team_timeouts_allowed = parse_flag(key, raw)?;
                false
            }
            "overtime_allowed" => {
                candidate.overtime_allowed = parse_flag(key, raw)?;
                true
            }
            "sudden_death_allowed" => {
                candidate.sudden_death_allowed = parse_flag(key, raw)?;
                true
            }
            "record_cap_numbers" => {
                candidate.record_cap_numbers = parse_flag(key, raw)?;
                false
            }
            "start_time" => {
                let trimmed = raw.trim();
                candidate.start_time = if trimmed.is_empty() {
                    None
                } else {
                    parse_start_time(trimmed)?;
                    Some(trimmed.to_string())
                };
                true
            }
            "starts_in" => {
                candidate.starts_in_minutes = parse_minutes(key, raw)?;
                true
            }
            "first_game_number" => {
                candidate.first_game_number = parse_count(key, raw)?;
                false
            }
            _ => return Err(ClockError::UnknownSetting(key.to_string())),
        };
        candidate.validate()?;
        *self = candidate;
        Ok(SettingChange { structural })
    }

    /// Checks ranges and cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        let minutes = [
            ("half_period", self.half_period_minutes),
            ("half_time_break", self.half_time_break_minutes),
            ("team_timeout_period", self.team_timeout_minutes),
            ("overtime_game_break", self.overtime_game_break_minutes),
            ("overtime_half_period", self.overtime_half_period_minutes),
            ("overtime_half_time_break", self.overtime_half_time_break_minutes),
            ("sudden_death_game_break", self.sudden_death_game_break_minutes),
            ("between_game_break", self.between_game_break_minutes),
            ("starts_in", self.starts_in_minutes),
        ];
        for (key, value) in minutes {
            if !value.is_finite() || value < 0.0 {
                return Err(ClockError::invalid_setting(
                    key,
                    &value.to_string(),
                    "must be a non-negative number",
                ));
            }
        }
        if self.half_period_seconds() == 0 {
            return Err(ClockError::invalid_setting(
                "half_period",
                &self.half_period_minutes.to_string(),
                "must be at least one second",
            ));
        }
        if self.overtime_allowed && self.overtime_half_period_seconds() == 0 {
            return Err(ClockError::invalid_setting(
                "overtime_half_period",
                &self.overtime_half_period_minutes.to_string(),
                "must be at least one second when overtime is allowed",
            ));
        }
        let break_seconds = self.between_game_break_seconds();
        if break_seconds as i64 - self.crib_time_seconds as i64 <= 31 {
            return Err(ClockError::CribTimeTooLarge {
                break_seconds,
                crib_seconds: self.crib_time_seconds,
            });
        }
        if let Some(start) = &self.start_time {
            parse_start_time(start)?;
        }
        Ok(())
    }

    pub fn half_period_seconds(&self) -> u32 {
        minutes_to_seconds(self.half_period_minutes)
    }

    pub fn half_time_break_seconds(&self) -> u32 {
        minutes_to_seconds(self.half_time_break_minutes)
    }

    pub fn team_timeout_seconds(&self) -> u32 {
        minutes_to_seconds(self.team_timeout_minutes)
    }

    pub fn overtime_game_break_seconds(&self) -> u32 {
        minutes_to_seconds(self.overtime_game_break_minutes)
    }

    pub fn overtime_half_period_seconds(&self) -> u32 {
        minutes_to_seconds(self.overtime_half_period_minutes)
    }

    pub fn overtime_half_time_break_seconds(&self) -> u32 {
        minutes_to_seconds(self.overtime_half_time_break_minutes)
    }

    pub fn sudden_death_game_break_seconds(&self) -> u32 {
        minutes_to_seconds(self.sudden_death_game_break_minutes)
    }

    pub fn between_game_break_seconds(&self) -> u32 {
        minutes_to_seconds(self.between_game_break_minutes)
    }

    /// Seconds until the first game starts, as seen from `now`.
    ///
    /// An absolute start time already passed today means tomorrow.
    pub fn first_game_starts_in_seconds(&self, now: NaiveDateTime) -> u32 {
        if let Some(start) = self.start_time.as_deref().and_then(|s| parse_start_time(s).ok()) {
            let mut target = now.date().and_time(start);
            if target <= now {
                target += chrono::Duration::days(1);
            }
            return (target - now).num_seconds().max(0) as u32;
        }
        minutes_to_seconds(self.starts_in_minutes).max(MIN_STARTS_IN_SECONDS)
    }
}

/// Runtime loop configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Tick rate in Hz (1-1000)
    pub tickrate: u32,
    /// Maximum inbound commands handled per tick
    pub max_commands_per_tick: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tickrate: 20,
            max_commands_per_tick: 64,
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.tickrate) {
            return Err(ClockError::invalid_setting(
                "tickrate",
                &self.tickrate.to_string(),
                "must be between 1 and 1000 Hz",
            ));
        }
        if self.max_commands_per_tick == 0 {
            return Err(ClockError::invalid_setting(
                "max_commands_per_tick",
                "0",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
