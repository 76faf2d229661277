//! Error types for the grid node agent

use thiserror::Error;

/// Node agent errors
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Cannot determine outbound address: {0}")]
    AddressResolution(String),

    #[error("Invalid listen address '{address}': {reason}")]
    InvalidListenAddress { address: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl NodeError {
    pub fn invalid_listen_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        NodeError::InvalidListenAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }
}

// Convert from standard library and ecosystem errors
impl From<std::io::Error> for NodeError {
    fn from(err: std::io::Error) -> Self {
        NodeError::AddressResolution(err.to_string())
    }
}

impl From<serde_json::Error> for NodeError {
    fn from(err: serde_json::Error) -> Self {
        NodeError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for NodeError {
    fn from(err: config::ConfigError) -> Self {
        NodeError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for NodeError {
    fn from(err: reqwest::Error) -> Self {
        NodeError::NetworkError(err.to_string())
    }
}

/// Result type for node agent operations
pub type NodeResult<T> = Result<T, NodeError>;
