//! Simulation time model.
//!
//! # Design
//!
//! Unlike a fixed-step scheduler, the escalator model integrates with a
//! variable `dt` supplied by the caller every tick (typically the wall-clock
//! frame delta).  The caller's value is clamped into [`DtBounds`] before use
//! so a frame hitch or a long pause cannot inject a huge step into the
//! integrator.  `SimClock` accumulates the simulated time and counts ticks;
//! there is no hidden global clock.

use std::fmt;

use crate::error::{EscError, EscResult, ensure_positive};

// ── DtBounds ──────────────────────────────────────────────────────────────────

/// Inclusive range a caller-supplied `dt` is clamped into.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DtBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for DtBounds {
    /// `[1e-5, 5e-3]` seconds.
    fn default() -> Self {
        Self { min: 1e-5, max: 5e-3 }
    }
}

impl DtBounds {
    pub fn validate(&self) -> EscResult<()> {
        ensure_positive("dt lower bound", self.min as f64)?;
        ensure_positive("dt upper bound", self.max as f64)?;
        if self.min > self.max {
            return Err(EscError::Config(format!(
                "dt lower bound {} exceeds upper bound {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Clamp `dt` into the bounds.  NaN maps to the lower bound.
    #[inline]
    pub fn clamp(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            return self.min;
        }
        dt.clamp(self.min, self.max)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Accumulated simulated time and tick count.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds since the start of the run.
    pub time: f64,
    /// Number of completed ticks.
    pub tick: u64,
    /// The dt used by the most recent tick (after clamping).
    pub last_dt: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick of length `dt`.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.time += dt as f64;
        self.tick += 1;
        self.last_dt = dt;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{} ({:.3}s)", self.tick, self.time)
    }
}
