//! Error types
//!
//! Only setup can fail. Runtime anomalies (re-fired milestones, zero-length
//! velocity, destroying a dead brick) are handled in place and never surface
//! as errors.

use thiserror::Error;

/// Invalid geometry supplied when building an entity.
///
/// Fatal to the offending entity's setup; not recoverable at runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{entity}: radius must be positive and finite, got {radius}")]
    InvalidRadius { entity: &'static str, radius: f32 },

    #[error("{entity}: size must be positive and finite, got {width}x{height}")]
    InvalidSize {
        entity: &'static str,
        width: f32,
        height: f32,
    },

    #[error("{entity}: speed must be positive and finite, got {speed}")]
    InvalidSpeed { entity: &'static str, speed: f32 },

    #[error("brick grid must have at least one row and one column, got {rows}x{columns}")]
    EmptyGrid { rows: u32, columns: u32 },

    #[error("brick grid {rows}x{columns} exceeds the {max} brick limit")]
    GridTooLarge { rows: u32, columns: u32, max: u32 },
}

/// Failure to load or validate a [`crate::Tuning`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tuning value `{name}` is out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
