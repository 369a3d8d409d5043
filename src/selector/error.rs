//! Error types for backend selection and text generation.

use thiserror::Error;

/// Errors that can occur during selector operations.
#[derive(Error, Debug)]
pub enum SelectorError {
    /// AI assistance is disabled or no backend is currently active.
    #[error("No text-generation backend available. Enable AI assistance and configure Ollama, TinyChat, or TinyLLM.")]
    NoBackendAvailable,

    /// The active backend's base URL cannot form a valid request target.
    #[error("Backend configuration is invalid: {0}")]
    InvalidConfiguration(String),

    /// The active backend resolved to a value with no concrete implementation.
    /// Indicates a sequencing bug; should not occur under correct use.
    #[error("Backend selector is in an invalid state")]
    InvalidState,

    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Backend returned an error response (4xx, 5xx).
    #[error("Backend error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Backend response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
