//! Line-oriented input from a siren button or an operator console.
//!
//! The button firmware repeats `SIREN_ON` for as long as it is held, so
//! siren lines are only forwarded when they change the button state.

use std::io::BufRead;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use uwh_clock_core::ClockError;

use crate::command::EngineCommand;
use crate::handle::EngineHandle;
use crate::Result;

/// What happened to one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Forwarded to the engine
    Sent(EngineCommand),
    /// Status request answered from the latest snapshot
    Answered,
    /// Siren line matching the current button state
    Repeated,
    /// Engine queue was full
    Dropped(EngineCommand),
    /// Empty line
    Blank,
    /// Not a valid command
    Rejected(String),
}

/// Counters for a finished listener.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListenerStats {
    pub lines: u64,
    pub sent: u64,
    pub rejected: u64,
}

/// Parses input lines and forwards them through an [`EngineHandle`].
#[derive(Debug)]
pub struct LineListener {
    handle: EngineHandle,
    button_down: bool,
    stats: ListenerStats,
}

impl LineListener {
    pub fn new(handle: EngineHandle) -> Self {
        Self {
            handle,
            button_down: false,
            stats: ListenerStats::default(),
        }
    }

    pub fn stats(&self) -> ListenerStats {
        self.stats
    }

    /// Handles one line. Only a closed engine channel is an error.
    pub fn handle_line(&mut self, line: &str) -> Result<LineOutcome> {
        self.stats.lines += 1;
        let line = line.trim();
        if line.is_empty() {
            return Ok(LineOutcome::Blank);
        }

        let command = match EngineCommand::parse_line(line) {
            Ok(command) => command,
            Err(e) => {
                warn!(line, "Ignoring input line: {}", e);
                self.stats.rejected += 1;
                return Ok(LineOutcome::Rejected(e.to_string()));
            }
        };

        match command {
            EngineCommand::Snapshot => {
                if let Some(snapshot) = self.handle.latest_snapshot() {
                    info!(
                        game = snapshot.game_number,
                        phase = %snapshot.phase_label,
                        clock = snapshot.clock.value,
                        white = snapshot.scores.white,
                        black = snapshot.scores.black,
                        court_time = %snapshot.court_time,
                        "Status"
                    );
                }
                return Ok(LineOutcome::Answered);
            }
            EngineCommand::StartSiren if self.button_down => return Ok(LineOutcome::Repeated),
            EngineCommand::StopSiren if !self.button_down => return Ok(LineOutcome::Repeated),
            _ => {}
        }

        debug!(?command, "Forwarding input line");
        if !self.handle.send(command.clone())? {
            return Ok(LineOutcome::Dropped(command));
        }
        // Button state follows what the engine will actually see.
        match command {
            EngineCommand::StartSiren => self.button_down = true,
            EngineCommand::StopSiren => self.button_down = false,
            _ => {}
        }
        self.stats.sent += 1;
        Ok(LineOutcome::Sent(command))
    }

    /// Reads lines until end of input or until the engine goes away.
    pub fn run<R: BufRead>(mut self, reader: R) -> Result<ListenerStats> {
        for line in reader.lines() {
            let line = line.map_err(|e| ClockError::Io(e.to_string()))?;
            match self.handle_line(&line) {
                Ok(_) => {}
                Err(ClockError::ChannelClosed) => {
                    info!("Engine stopped, listener exiting");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(self.stats)
    }
}

/// Runs a [`LineListener`] over `reader` on its own thread.
pub fn spawn_listener<R>(
    name: &str,
    handle: EngineHandle,
    reader: R,
) -> Result<JoinHandle<Result<ListenerStats>>>
where
    R: BufRead + Send + 'static,
{
    let name = name.to_string();
    thread::Builder::new()
        .name(format!("listener-{}", name))
        .spawn(move || {
            info!(source = %name, "Listening for input lines");
            let stats = LineListener::new(handle).run(reader);
            if let Err(e) = &stats {
                warn!(source = %name, "Listener failed: {}", e);
            }
            stats
        })
        .map_err(|e| ClockError::Io(e.to_string()))
}
