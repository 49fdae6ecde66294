//! ---
//! tg_section: "11-simulation-test-harness"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Bounded random-walk signal generation."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
//! Signal generation for the telegen workspace.
//!
//! The only signal modelled here is a single scalar (a device's battery
//! temperature) advanced by a bounded random walk. Randomness is an injected
//! capability so that every walk is reproducible under test.

pub mod sampler;
pub mod walk;

pub use sampler::{DriftSampler, UniformDrift};
pub use walk::{RandomWalk, SignalBounds, SignalError};

/// Shared result type for signal operations.
pub type Result<T> = std::result::Result<T, SignalError>;
