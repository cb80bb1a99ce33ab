//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `EscError` as one
//! variant via `#[from]`, so validation helpers living here can be reused
//! with `?` at every construction site.

use thiserror::Error;

/// The base error type for `esc-core` and a common variant for sub-crates.
#[derive(Debug, Error, PartialEq)]
pub enum EscError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{what} must be a probability in [0, 1], got {value}")]
    Probability { what: &'static str, value: f64 },

    #[error("{what} must be finite and positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("{what} must be at least 1")]
    Empty { what: &'static str },
}

/// Shorthand result type for all `esc-*` crates.
pub type EscResult<T> = Result<T, EscError>;

/// Reject values that are not finite or not strictly positive.
pub fn ensure_positive(what: &'static str, value: f64) -> EscResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EscError::NonPositive { what, value })
    }
}

/// Reject values outside `[0, 1]` (including NaN).
pub fn ensure_probability(what: &'static str, value: f64) -> EscResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EscError::Probability { what, value })
    }
}

/// Reject zero counts.
pub fn ensure_nonzero(what: &'static str, value: usize) -> EscResult<()> {
    if value == 0 {
        Err(EscError::Empty { what })
    } else {
        Ok(())
    }
}
