//! Error types for clicker-sync

use thiserror::Error;

/// Sync error type
#[derive(Debug, Error)]
pub enum Error {
    /// A message could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A delta arrived before any full state
    #[error("No full state received yet")]
    NoBaseState,
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, Error>;
