//! Configuration errors for objective construction.
//!
//! Expected runtime failures (unreachable targets, removed entities) are never
//! errors; they surface as abandonment. Only malformed configuration is
//! rejected, and only at construction time.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ObjectiveError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ObjectiveError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidInterval { name: &'static str, value: f32 },

    #[error("target update interval must be greater than zero (got {0})")]
    ZeroUpdateInterval(f32),

    #[error("priority modifier must be finite and non-negative (got {0})")]
    InvalidPriorityModifier(f32),

    #[error("order priority must be finite and greater than 1 (got {0})")]
    InvalidOrderPriority(f32),
}

/// Checks that `value` is a usable countdown/interval length.
pub(crate) fn check_interval(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ObjectiveError::InvalidInterval { name, value })
    }
}
