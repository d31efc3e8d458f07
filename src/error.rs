//! Input-validation errors.
//!
//! Only malformed or out-of-range *inputs* are errors. Numerical edge cases
//! (no root inside the disc, a missing wedge successor, a failed eigen-solve)
//! are absorbed by the engines and reported through `tracing` instead.

use thiserror::Error;

/// Errors raised when a caller hands the crate an unusable input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DynamicsError {
    /// The angle string is not of the form `numerator/denominator` with integer parts.
    #[error("invalid angle string {input:?}: expected `numerator/denominator` with integer parts (e.g. '3/4')")]
    MalformedAngle {
        /// The rejected input.
        input: String,
    },

    /// The angle denominator is zero or negative.
    #[error("angle denominator must be positive, got {0}")]
    NonPositiveDenominator(i64),

    /// The angle does not lie on the closed unit interval.
    #[error("angle {num}/{den} lies outside [0, 1]")]
    AngleOutOfRange {
        /// Numerator as supplied.
        num: i64,
        /// Denominator as supplied.
        den: i64,
    },

    /// The denominator is too large for exact doubling in 64-bit arithmetic.
    #[error("angle denominator {den} exceeds the supported maximum {max}")]
    DenominatorTooLarge {
        /// Denominator as supplied.
        den: i64,
        /// Largest accepted denominator.
        max: i64,
    },

    /// The neighbor-graph parameter could not be read as a complex number.
    #[error("the parameter {input:?} is not a complex number")]
    MalformedParameter {
        /// The rejected input.
        input: String,
    },

    /// The neighbor-graph parameter has a NaN or infinite component.
    #[error("the parameter is not finite: re={re}, im={im}")]
    NonFiniteParameter {
        /// Real part.
        re: f64,
        /// Imaginary part.
        im: f64,
    },

    /// The maximum depth could not be read as a non-negative integer.
    #[error("the maximum depth {input:?} is not a non-negative integer")]
    MalformedDepth {
        /// The rejected input.
        input: String,
    },
}

/// Convenience alias used throughout the crate.
pub type DynamicsResult<T> = Result<T, DynamicsError>;
