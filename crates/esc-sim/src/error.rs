use esc_belt::BeltError;
use esc_core::EscError;
use esc_crowd::CrowdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] EscError),

    #[error("{what} length {got} does not match escalator count {expected}")]
    PairCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("escalator error: {0}")]
    Belt(#[from] BeltError),

    #[error("crowd error: {0}")]
    Crowd(#[from] CrowdError),
}

pub type SimResult<T> = Result<T, SimError>;
