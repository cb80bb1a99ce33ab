use esc_core::EscError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CrowdError {
    #[error("crowd configuration error: {0}")]
    Config(#[from] EscError),

    #[error("spawn offset must be finite, got {0:?}")]
    BadOffset([f32; 3]),
}

pub type CrowdResult<T> = Result<T, CrowdError>;
