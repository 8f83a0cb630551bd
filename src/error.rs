// error.rs - Engine error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration override was not valid JSON or had a key of the wrong shape.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid color {value:?} (expected #rgb, #rrggbb, #rrggbbaa or transparent)")]
    Color { value: String },

    /// The host surface rejected a drawing primitive.
    #[error("surface {op} failed: {reason}")]
    Surface { op: &'static str, reason: String },

    /// The host refused to schedule a frame callback.
    #[error("frame scheduling failed: {0}")]
    Schedule(String),
}

impl EngineError {
    pub fn surface(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Surface { op, reason: reason.into() }
    }
}
