//! Cloneable sender side of the engine command channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use uwh_clock_core::{ClockError, EngineSnapshot};

use crate::command::{CommandReply, EngineCommand, EngineRequest};
use crate::Result;

/// Latest engine snapshot, published by the runtime once per tick.
pub type SharedSnapshot = Arc<RwLock<Option<EngineSnapshot>>>;

/// Handle for injecting events from any thread.
///
/// Sending never blocks the caller. When the channel is full the command is
/// dropped and counted.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
    dropped: Arc<AtomicU64>,
    snapshot: SharedSnapshot,
}

impl EngineHandle {
    pub(crate) fn new(
        tx: mpsc::Sender<EngineRequest>,
        dropped: Arc<AtomicU64>,
        snapshot: SharedSnapshot,
    ) -> Self {
        Self {
            tx,
            dropped,
            snapshot,
        }
    }

    /// Queues a command without waiting for its outcome.
    ///
    /// Returns false if the command was dropped because the queue was full.
    pub fn send(&self, command: EngineCommand) -> Result<bool> {
        self.enqueue(EngineRequest {
            command,
            response: None,
        })
    }

    /// Queues a command and returns a receiver for the reply.
    pub fn request(
        &self,
        command: EngineCommand,
    ) -> Result<oneshot::Receiver<Result<CommandReply>>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.enqueue(EngineRequest {
            command,
            response: Some(response_tx),
        })?;
        Ok(response_rx)
    }

    /// Queues a command and blocks the calling thread until the engine
    /// answers. Must not be called from inside an async task.
    pub fn blocking_request(&self, command: EngineCommand) -> Result<CommandReply> {
        let response_rx = self.request(command)?;
        response_rx
            .blocking_recv()
            .map_err(|_| ClockError::ChannelClosed)?
    }

    pub fn start_siren(&self) -> Result<bool> {
        self.send(EngineCommand::StartSiren)
    }

    pub fn stop_siren(&self) -> Result<bool> {
        self.send(EngineCommand::StopSiren)
    }

    /// Snapshot published at the end of the last tick.
    pub fn latest_snapshot(&self) -> Option<EngineSnapshot> {
        self.snapshot.read().clone()
    }

    /// Commands dropped because the channel was full.
    pub fn dropped_commands(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn enqueue(&self, request: EngineRequest) -> Result<bool> {
        match self.tx.try_send(request) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(request)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(command = ?request.command, "Command queue full, dropping command");
                Ok(false)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ClockError::ChannelClosed),
        }
    }
}
