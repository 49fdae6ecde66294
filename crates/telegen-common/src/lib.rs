//! ---
//! tg_section: "01-core-functionality"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Shared primitives and utilities for the telegen runtime."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
//! Core shared primitives for the telegen workspace.
//! This crate exposes configuration loading, logging setup, and
//! loop-timing metrics consumed across the workspace.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod time;

pub use config::{AppConfig, LoadedAppConfig, LoggingConfig, PublishConfig, SignalConfig, SinkKind};
pub use logging::{init_tracing, LogFormat};
pub use metrics::{JitterHistogram, JitterSummary, TickTimingReporter};
pub use time::{interval_for_rate, jitter_us};
