//! Error types for the state store.

use thiserror::Error;

/// Errors that can occur while writing persisted state.
///
/// Reads never error: missing, corrupt, or mistyped values yield defaults.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
