//! Finished-match records and their CSV log.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{ClockError, Result};
use crate::observer::MatchObserver;
use crate::penalty::{PenaltyDuration, PenaltyRecord};
use crate::period::PeriodId;
use crate::team::{Scores, Team};

pub const RESULTS_FILE: &str = "results.csv";
pub const PENALTIES_FILE: &str = "penalties.csv";

/// One goal as recorded by the match official.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub team: Team,
    /// Only kept when cap-number recording is on
    pub cap: Option<u8>,
    pub period: PeriodId,
    /// Match clock value when the goal was recorded
    pub clock_value: i64,
}

/// Final state of one match instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub game_number: u32,
    pub finished_at: NaiveDateTime,
    pub scores: Scores,
    pub penalties: Vec<PenaltyRecord>,
    pub goals: Vec<GoalRecord>,
}

impl MatchRecord {
    /// Winning team, `None` for a draw.
    pub fn winner(&self) -> Option<Team> {
        match self.scores.white.cmp(&self.scores.black) {
            std::cmp::Ordering::Greater => Some(Team::White),
            std::cmp::Ordering::Less => Some(Team::Black),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Row of `results.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub game_number: u32,
    pub finished_at: String,
    pub white_score: u32,
    pub black_score: u32,
    /// `team:cap` per goal, `;`-separated; cap is empty when not recorded
    pub scorers: String,
}

/// Row of `penalties.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRow {
    pub game_number: u32,
    pub team: Team,
    pub cap: u8,
    pub duration: PenaltyDuration,
}

impl From<&MatchRecord> for ResultRow {
    fn from(record: &MatchRecord) -> Self {
        let scorers = record
            .goals
            .iter()
            .map(|g| match g.cap {
                Some(cap) => format!("{}:{}", g.team.name().to_ascii_lowercase(), cap),
                None => format!("{}:", g.team.name().to_ascii_lowercase()),
            })
            .collect::<Vec<_>>()
            .join(";");
        Self {
            game_number: record.game_number,
            finished_at: record.finished_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            white_score: record.scores.white,
            black_score: record.scores.black,
            scorers,
        }
    }
}

/// Maps an I/O error to a [`ClockError`] with context.
pub fn classify_io_error(error: std::io::Error, context: &str) -> ClockError {
    match error.kind() {
        ErrorKind::StorageFull => ClockError::Io(format!("{}: disk full: {}", context, error)),
        ErrorKind::PermissionDenied => {
            ClockError::Io(format!("{}: permission denied: {}", context, error))
        }
        _ => ClockError::Io(format!("{}: {}", context, error)),
    }
}

fn csv_error(error: csv::Error, context: &str) -> ClockError {
    ClockError::Csv(format!("{}: {}", context, error))
}

/// Append-only CSV log in a results directory.
#[derive(Debug, Clone)]
pub struct ResultsLog {
    dir: PathBuf,
}

impl ResultsLog {
    /// Opens the log, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| classify_io_error(e, "Failed to create results directory"))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir.join(RESULTS_FILE)
    }

    pub fn penalties_path(&self) -> PathBuf {
        self.dir.join(PENALTIES_FILE)
    }

    /// Appends one match to both files.
    pub fn append(&self, record: &MatchRecord) -> Result<()> {
        append_rows(&self.results_path(), [ResultRow::from(record)])?;
        append_rows(
            &self.penalties_path(),
            record.penalties.iter().map(|p| PenaltyRow {
                game_number: record.game_number,
                team: p.team,
                cap: p.cap,
                duration: p.duration,
            }),
        )?;
        Ok(())
    }

    /// Reads back every row of `results.csv`. Missing file reads as empty.
    pub fn read_results(&self) -> Result<Vec<ResultRow>> {
        read_rows(&self.results_path())
    }

    pub fn read_penalties(&self) -> Result<Vec<PenaltyRow>> {
        read_rows(&self.penalties_path())
    }
}

fn append_rows<R: Serialize>(path: &Path, rows: impl IntoIterator<Item = R>) -> Result<()> {
    let mut rows = rows.into_iter().peekable();
    if rows.peek().is_none() {
        return Ok(());
    }
    let write_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| classify_io_error(e, "Failed to open results file"))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| csv_error(e, "Failed to write results row"))?;
    }
    writer
        .flush()
        .map_err(|e| classify_io_error(e, "Failed to flush results file"))?;
    Ok(())
}

fn read_rows<R: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<R>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| csv_error(e, "Failed to open results file"))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| csv_error(e, "Failed to parse results row")))
        .collect()
}

/// Persists every completed match to a [`ResultsLog`].
#[derive(Debug, Clone)]
pub struct CsvResultsObserver {
    log: ResultsLog,
}

impl CsvResultsObserver {
    pub fn new(log: ResultsLog) -> Self {
        Self { log }
    }
}

impl MatchObserver for CsvResultsObserver {
    fn on_match_complete(&mut self, record: &MatchRecord) {
        match self.log.append(record) {
            Ok(()) => info!(
                game = record.game_number,
                path = %self.log.results_path().display(),
                "Match result saved"
            ),
            Err(e) => error!(game = record.game_number, "Failed to save match result: {}", e),
        }
    }
}
