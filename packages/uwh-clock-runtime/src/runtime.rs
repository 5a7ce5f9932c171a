//! Runtime loop with tick phases and timing enforcement.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use uwh_clock_core::{MatchEngine, RuntimeConfig};

use crate::command::EngineRequest;
use crate::handle::{EngineHandle, SharedSnapshot};
use crate::tick_phases::{TickPhase, TickPhaseProcessor};
use crate::Result;

/// Main runtime loop. Owns the engine; everything else talks to it through
/// an [`EngineHandle`].
pub struct Runtime {
    /// Match engine
    engine: MatchEngine,
    /// Configuration
    config: RuntimeConfig,
    /// Tick duration
    tick_duration: Duration,
    /// Command receiver
    command_rx: mpsc::Receiver<EngineRequest>,
    /// Handle given out to callers
    handle: EngineHandle,
    /// Wall instant matching `engine_origin`
    started_at: Instant,
    /// Engine time when the runtime took over
    engine_origin: Duration,
    /// Commands processed in the current tick
    commands_processed_this_tick: u32,
    /// Commands dropped by handles because the channel was full
    dropped_commands: Arc<AtomicU64>,
    /// Snapshot published each tick
    snapshot: SharedSnapshot,
    /// Set to stop `run`
    shutdown: Arc<AtomicBool>,
    /// Current tick count
    tick_count: u64,
}

impl Runtime {
    /// Create a new runtime, starting the engine if it has not been started.
    pub fn new(mut engine: MatchEngine, config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        let tick_duration = Duration::from_secs_f64(1.0 / config.tickrate as f64);
        let queue_capacity = config.tickrate as usize * 100;
        let (command_tx, command_rx) = mpsc::channel(queue_capacity);
        let dropped_commands = Arc::new(AtomicU64::new(0));
        let snapshot: SharedSnapshot = Arc::new(RwLock::new(None));
        let handle = EngineHandle::new(command_tx, dropped_commands.clone(), snapshot.clone());

        engine.start();
        *snapshot.write() = Some(engine.snapshot());
        let engine_origin = engine.elapsed();

        info!(
            tickrate = config.tickrate,
            max_commands_per_tick = config.max_commands_per_tick,
            queue_capacity,
            "Runtime created"
        );

        Ok(Self {
            engine,
            config,
            tick_duration,
            command_rx,
            handle,
            started_at: Instant::now(),
            engine_origin,
            commands_processed_this_tick: 0,
            dropped_commands,
            snapshot,
            shutdown: Arc::new(AtomicBool::new(false)),
            tick_count: 0,
        })
    }

    /// A new handle for sending commands.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Flag that stops [`Runtime::run`] once set.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn commands_processed_this_tick(&self) -> u32 {
        self.commands_processed_this_tick
    }

    pub fn dropped_commands(&self) -> u64 {
        self.dropped_commands.load(Ordering::Relaxed)
    }

    /// Engine time for the current instant.
    fn engine_time(&self) -> Duration {
        self.engine_origin + self.started_at.elapsed()
    }

    /// Execute a single tick of the runtime
    pub fn tick(&mut self) -> Result<()> {
        let tick_start = Instant::now();

        // Phase 1: inbound commands
        self.process_tick_phase(TickPhase::Commands, tick_start)?;

        // Phase 2: due timers
        self.process_tick_phase(TickPhase::Timers, tick_start)?;

        *self.snapshot.write() = Some(self.engine.snapshot());

        self.sleep_remaining(tick_start);

        self.tick_count += 1;
        Ok(())
    }

    /// Run the runtime loop until the shutdown flag is set (blocking)
    pub fn run(&mut self) -> Result<()> {
        info!("Runtime loop started");
        while !self.shutdown.load(Ordering::Relaxed) {
            self.tick()?;
        }
        info!(ticks = self.tick_count, "Runtime loop stopped");
        Ok(())
    }

    /// Drains up to `max_commands_per_tick` commands and applies them.
    pub(crate) fn process_commands_phase(&mut self, tick_start: Instant) -> Result<()> {
        let time_budget = self.tick_duration.mul_f32(0.5);
        let mut processed = 0;

        while processed < self.config.max_commands_per_tick {
            if tick_start.elapsed() > time_budget {
                break;
            }
            let Ok(request) = self.command_rx.try_recv() else {
                break;
            };
            debug!(command = ?request.command, "Applying command");
            let reply = request.command.apply(&mut self.engine);
            if let Err(e) = &reply {
                warn!("Command failed: {}", e);
            }
            if let Some(response) = request.response {
                // Caller may have stopped waiting.
                let _ = response.send(reply);
            }
            processed += 1;
        }

        self.commands_processed_this_tick = processed;
        Ok(())
    }

    /// Fires every engine tick that has come due.
    pub(crate) fn process_timers_phase(&mut self) -> Result<()> {
        let now = self.engine_time();
        self.engine.advance_to(now);
        Ok(())
    }

    fn sleep_remaining(&self, tick_start: Instant) {
        if let Some(remaining) = self.tick_duration.checked_sub(tick_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
}
