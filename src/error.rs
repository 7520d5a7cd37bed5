//! Error types for dnsutils-bot operations.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for dnsutils-bot operations
#[derive(Error, Debug)]
pub enum DnsUtilsError {
    /// The external tool could not be started (not found, permission denied, ...)
    #[error("{source}")]
    ProcessLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Persistent key-value store could not be read or written
    #[error("store error at {}: {}", .0.display(), .1)]
    Store(PathBuf, String),

    /// Config file could not be read or parsed
    #[error("failed to load config {}: {}", .0.display(), .1)]
    ConfigRead(PathBuf, String),

    /// Config parsed but failed validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias for dnsutils-bot operations
pub type Result<T> = std::result::Result<T, DnsUtilsError>;
