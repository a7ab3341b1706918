//! Error types for webfaction-ddns.

use thiserror::Error;

/// Result type alias for webfaction-ddns.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Configuration error (e.g. no resolvable home directory).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// Remote API error from a named XML-RPC method.
    #[error("API error ({method}): {message}")]
    Api { method: String, message: String },

    /// Public IP lookup error.
    #[error("IP lookup failed: {0}")]
    IpLookup(String),

    /// IO error (cache file read/write).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        DdnsError::Network(e.to_string())
    }
}
