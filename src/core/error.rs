use std::io;
use thiserror::Error;

/// Unified error type for the docchat application
#[derive(Error, Debug)]
pub enum DocChatError {
    /// File extension not in the supported allow-list
    #[error("Unsupported document format: .{0}")]
    UnsupportedFormat(String),

    /// Underlying document parser failure (corrupt file, wrong magic bytes)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Invalid text encoding in a plain-text document
    #[error("Decode error: {0}")]
    Decode(String),

    /// Completion gateway failures (auth, quota, malformed request, bad response)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for DocChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DocChatError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            DocChatError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            DocChatError::Gateway(format!("API returned error status: {}", err))
        } else {
            DocChatError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for DocChatError {
    fn from(err: serde_json::Error) -> Self {
        DocChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for DocChatError {
    fn from(err: serde_yml::Error) -> Self {
        DocChatError::Serialization(format!("YAML error: {}", err))
    }
}
