//! Error types for each layer of the audit.

use std::path::PathBuf;

use crate::Severity;

/// Category attached to every failure that originates at the remote API.
pub const API_ERROR: &str = "API Error";

/// The only error that crosses the client, check, and orchestrator layers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} - {}: {}", .severity.as_upper(), .category, .message)]
pub struct RemoteError {
    pub message: String,
    pub category: String,
    pub severity: Severity,
}

impl RemoteError {
    pub fn new(message: impl Into<String>, category: impl Into<String>, severity: Severity) -> Self {
        RemoteError {
            message: message.into(),
            category: category.into(),
            severity,
        }
    }

    /// High-severity failure in the "API Error" category
    pub fn api(message: impl Into<String>) -> Self {
        RemoteError::new(message, API_ERROR, Severity::High)
    }

    /// Re-wrap a lower-level failure with the action that was in progress.
    pub fn context(self, action: &str) -> Self {
        RemoteError::api(format!("Failed to {action}: {}", self.message))
    }
}

/// Failure of a single wire-level attempt. Never leaves the client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error returned to the binary.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("failed to write report to {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
