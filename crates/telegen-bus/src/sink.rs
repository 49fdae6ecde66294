//! ---
//! tg_section: "02-messaging-ipc-data-model"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Message envelopes and publish capabilities."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::{PublishError, Result, TelemetryEnvelope};

/// Publish capability handed to the scheduler.
///
/// Implementations must be cheap to call at the configured tick rate; the
/// host owns connection setup and teardown towards any real bus.
pub trait TelemetrySink: Send + Sync {
    /// Publish one frame onto the named channel.
    fn publish(&self, channel: &str, frame: &TelemetryEnvelope) -> Result<()>;
    /// Human-readable sink name for logging/metrics.
    fn name(&self) -> &'static str;
}

/// In-memory sink backed by a mutex protected queue.
///
/// Primarily for tests and single-process integration; consumers drain the
/// queue on their own schedule.
#[derive(Clone, Default)]
pub struct InMemoryBus {
    queue: Arc<Mutex<VecDeque<(String, TelemetryEnvelope)>>>,
}

impl InMemoryBus {
    /// Create a new empty in-memory bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest frame, if any.
    pub fn recv(&self) -> Option<(String, TelemetryEnvelope)> {
        let mut guard = self.queue.lock().expect("queue poisoned");
        guard.pop_front()
    }

    /// Number of frames waiting in the queue.
    pub fn len(&self) -> usize {
        self.queue.lock().expect("queue poisoned").len()
    }

    /// True when no frames are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain every queued frame in publish order.
    pub fn drain(&self) -> Vec<(String, TelemetryEnvelope)> {
        let mut guard = self.queue.lock().expect("queue poisoned");
        guard.drain(..).collect()
    }
}

impl TelemetrySink for InMemoryBus {
    fn publish(&self, channel: &str, frame: &TelemetryEnvelope) -> Result<()> {
        let mut guard = self
            .queue
            .lock()
            .map_err(|_| PublishError::Unavailable("in_memory"))?;
        guard.push_back((channel.to_owned(), frame.clone()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

/// Sink that structured-logs every frame instead of shipping it anywhere.
///
/// The default for the standalone daemon: downstream development against the
/// log stream needs no bus at all, which mirrors how the reference publisher
/// printed each message it sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn publish(&self, channel: &str, frame: &TelemetryEnvelope) -> Result<()> {
        let payload = serde_json::to_string(&frame.payload)?;
        info!(
            channel,
            tick = frame.tick,
            elapsed_s = frame.elapsed_s,
            payload = %payload,
            "publishing frame"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}
