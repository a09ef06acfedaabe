use thiserror::Error;

use crate::enumerate::ViewId;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors raised by the enumeration, projection and window layers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExploreError {
    /// Bad or missing shape data (duplicate axis names, too few dimensions,
    /// a sample record that does not match the declared value type, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A raw record whose value disagrees with the declared value type.
    #[error("malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// A window edit that would leave `start >= end`.
    #[error("invalid window range: start {start} must be below end {end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("unknown dataset view {0}")]
    UnknownView(ViewId),

    #[error("view {view} has no {state} state for axis '{axis}'")]
    UnknownAxis {
        view: ViewId,
        axis: String,
        state: &'static str,
    },
}

pub type ExploreResult<T> = Result<T, ExploreError>;

impl ExploreError {
    pub fn config(message: impl Into<String>) -> Self {
        ExploreError::Configuration(message.into())
    }
}
