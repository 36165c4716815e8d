//! Error types for tripr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in tripr
#[derive(Debug, Error)]
pub enum TriprError {
    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Upstream search API returned a non-success status
    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Tool execution error
    #[error("Tool error: {0}")]
    Tool(String),

    /// Tool call input failed validation
    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    /// Required credential missing from the environment
    #[error("Missing API key: environment variable {0} not set")]
    MissingApiKey(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tripr operations
pub type Result<T> = std::result::Result<T, TriprError>;
