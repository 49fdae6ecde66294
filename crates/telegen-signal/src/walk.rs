//! ---
//! tg_section: "11-simulation-test-harness"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Bounded random-walk signal generation."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use crate::sampler::DriftSampler;

/// Errors raised by signal construction and stepping.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Lower bound at or above the upper bound, or a non-finite bound.
    #[error("invalid signal bounds: lower {lower} must be below upper {upper} and both finite")]
    InvalidBounds { lower: f64, upper: f64 },
    /// Step width must be a positive finite number of seconds.
    #[error("invalid step width: dt must be positive and finite, got {dt}")]
    InvalidStep { dt: f64 },
    /// Seed readings may lie outside the bounds but must be finite, or the
    /// clamp could never pull the walk back in range.
    #[error("invalid seed value: {value}")]
    InvalidSeed { value: f64 },
}

/// Hard clamping range for the walk, in the unit of the signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalBounds {
    pub lower: f64,
    pub upper: f64,
}

impl SignalBounds {
    pub fn new(lower: f64, upper: f64) -> Result<Self, SignalError> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(SignalError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Saturating clamp: out-of-range values are pulled exactly to the
    /// nearest bound, never reflected or wrapped.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

/// Bounded random walk over a single scalar reading.
///
/// Per step the drift is drawn uniformly from `[-dt, 2*dt)`. The asymmetry
/// (upward excursions may be twice as large as downward ones) matches the
/// reference publisher and is deliberately preserved.
pub struct RandomWalk {
    value: f64,
    bounds: SignalBounds,
    sampler: Box<dyn DriftSampler>,
}

impl std::fmt::Debug for RandomWalk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomWalk")
            .field("value", &self.value)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl RandomWalk {
    /// Create a walk seeded at `initial`. An out-of-bound seed is tolerated
    /// and pulled inside the range on the first step.
    pub fn new(
        initial: f64,
        bounds: SignalBounds,
        sampler: Box<dyn DriftSampler>,
    ) -> Result<Self, SignalError> {
        if !initial.is_finite() {
            return Err(SignalError::InvalidSeed { value: initial });
        }
        Ok(Self {
            value: initial,
            bounds,
            sampler,
        })
    }

    /// Current reading. Within bounds after any step; may be outside them
    /// only before the first step when seeded out of range.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn bounds(&self) -> SignalBounds {
        self.bounds
    }

    /// Advance the walk by one tick of width `dt` seconds and return the new
    /// reading, guaranteed within bounds.
    pub fn step(&mut self, dt: f64) -> Result<f64, SignalError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SignalError::InvalidStep { dt });
        }
        let drift = self.sampler.sample(-dt, 2.0 * dt);
        self.value = self.bounds.clamp(self.value + drift);
        Ok(self.value)
    }
}
