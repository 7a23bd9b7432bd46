//! Error types for the liquid reveal core.
//!
//! Errors are only produced while configuring the effect (building a
//! controller, parsing parameters, wrapping pixel buffers). The per-frame
//! path never fails.

use thiserror::Error;

/// Errors produced while configuring or materializing the effect.
#[derive(Debug, Error)]
pub enum EffectError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The trail must hold at least one point.
    #[error("invalid trail length: at least one trail point is required")]
    InvalidTrailLength,

    /// A smoothing or pursuit rate fell outside (0, 1].
    #[error("invalid rate for '{name}': {value} is not in (0, 1]")]
    InvalidRate { name: String, value: f64 },

    /// A parameter had the right type but an unusable value.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A parameter name in a JSON override object is not recognized.
    #[error("parameter not found: {0}")]
    ParamNotFound(String),

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A pixel buffer did not match the dimensions it was declared with.
    #[error("dimension mismatch: expected {expected} values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The requested scripted gesture does not exist.
    #[error("unknown gesture: {0}")]
    UnknownGesture(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Reading or writing an image failed.
    #[error("i/o error: {0}")]
    Io(String),
}
