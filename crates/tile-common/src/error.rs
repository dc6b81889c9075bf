//! Error types for the tile renderer.

use thiserror::Error;

/// Result type alias using TilerError.
pub type TilerResult<T> = Result<T, TilerError>;

/// Primary error type for tile rendering operations.
#[derive(Debug, Error)]
pub enum TilerError {
    // === Input Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    // === Data Errors ===
    #[error("Failed to decode region data: {0}")]
    Decode(String),

    // === Output Errors ===
    #[error("Failed to encode tile: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TilerError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Whether the failure only affects the region being processed.
    ///
    /// A pipeline can skip the region and carry on with the remaining ones;
    /// every other kind aborts the run.
    pub fn is_region_scoped(&self) -> bool {
        matches!(self, TilerError::Decode(_))
    }
}

impl From<serde_json::Error> for TilerError {
    fn from(err: serde_json::Error) -> Self {
        TilerError::Encode(format!("JSON error: {}", err))
    }
}
