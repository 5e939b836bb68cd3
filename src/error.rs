//! Unified error types for the status daemon.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the status daemon.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// The user's home directory could not be determined.
    #[error("cannot determine home directory")]
    NoHomeDir,

    /// Directory provisioning failed. Fatal at startup: the listener must
    /// not bind if this occurs.
    #[error("failed to create {name} directory {path}: {source}")]
    Provision {
        /// Logical directory name (data, log, cache).
        name: &'static str,
        /// The path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Database error from the dependency check.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Dependency check exceeded the configured timeout.
    #[error("database ping timed out after {timeout_ms}ms")]
    PingTimeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_error_names_the_directory() {
        let err = ServiceError::Provision {
            name: "data",
            path: PathBuf::from("/nope/data"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let msg = err.to_string();
        assert!(msg.contains("data"));
        assert!(msg.contains("/nope/data"));
    }

    #[test]
    fn ping_timeout_reports_the_budget() {
        let err = ServiceError::PingTimeout { timeout_ms: 250 };
        assert_eq!(err.to_string(), "database ping timed out after 250ms");
    }
}
