//! ---
//! tg_section: "02-messaging-ipc-data-model"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Message envelopes and publish capabilities."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
#![warn(missing_docs)]

//! Messaging primitives for the telegen workspace.
//!
//! The scheduler never talks to a concrete bus implementation; it hands each
//! frame to a [`TelemetrySink`] capability supplied by the host. This crate
//! defines the envelope carried on the bus and the sink implementations
//! shipped with the daemon.

pub mod envelope;
pub mod sink;

/// Shared result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;

/// Errors surfaced by publish capabilities.
///
/// Publish failures are contained by the scheduler (logged and counted, loop
/// continues); they never crash the generator process.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The bus rejected or dropped the frame.
    #[error("bus rejected frame on channel '{channel}': {reason}")]
    Rejected {
        /// Channel the frame was destined for.
        channel: String,
        /// Bus-supplied failure description.
        reason: String,
    },
    /// The sink is no longer reachable.
    #[error("sink '{0}' unavailable")]
    Unavailable(&'static str),
    /// Wrapper for JSON serialization problems while encoding a frame.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub use envelope::{TelemetryEnvelope, SCHEMA_VERSION};
pub use sink::{InMemoryBus, TelemetrySink, TracingSink};
