use esc_core::EscError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BeltError {
    #[error("belt configuration error: {0}")]
    Config(#[from] EscError),

    #[error("ramp bounds are empty or inverted: min {min:?}, max {max:?}")]
    BadRamp { min: [f32; 3], max: [f32; 3] },

    #[error("handrail margin {margin} leaves no room on a step {width} wide")]
    MarginTooWide { margin: f32, width: f32 },

    #[error("a belt needs at least two steps in total, got {0}")]
    TooFewSteps(usize),
}

pub type BeltResult<T> = Result<T, BeltError>;
