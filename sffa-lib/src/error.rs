use crate::layout::Field;
use thiserror::Error;

/// The primary error type for the `sffa-lib` crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("{field} value {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
