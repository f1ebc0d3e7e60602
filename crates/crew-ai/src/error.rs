//! Configuration errors.
//!
//! Objectives themselves never fail: unreachable or vanished targets surface
//! as abandonment. Errors only arise while loading or validating settings.
use std::path::PathBuf;

use objective::ObjectiveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config RON: {0}")]
    Parse(String),

    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidValue { name: &'static str, value: f32 },

    #[error("{name} ({value}) must stay below the order tier, at most {ceiling}")]
    AboveOrderTier {
        name: &'static str,
        value: f32,
        ceiling: f32,
    },

    #[error(transparent)]
    Objective(#[from] ObjectiveError),
}
