//! Error types for tree-walker
//!
//! This module defines the error hierarchy for:
//! - Walk outcomes (the single failure a walk resolves to)
//! - The namespace provider boundary
//! - Executor construction and job rejection
//! - Configuration and CLI validation
//!
//! Provider and callback failures are funneled through
//! [`classify_provider_error`] and [`classify_callback_error`] so that every
//! task reports failures with the same taxonomy.

use crate::executor::Job;
use std::any::Any;
use std::fmt;
use std::io;
use thiserror::Error;

/// Error type a walk resolves to on failure
#[derive(Error, Debug)]
pub enum WalkerError {
    /// The listed path (root or a discovered subdirectory) did not exist
    #[error("Location does not exist: '{path}'")]
    NotFound { path: String },

    /// Backend/transport failure while listing or iterating
    #[error("I/O error while walking '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Unexpected failure while iterating entries or running the callback
    #[error("Unexpected failure while walking '{path}': {message}")]
    Runtime { path: String, message: String },

    /// The executor refused the listing task for this path
    #[error("Executor rejected listing task for '{path}'")]
    Rejected { path: String },

    /// A listing task was dropped by the executor without running
    #[error("Listing task for '{path}' was dropped before it ran")]
    Abandoned { path: String },

    /// The handle was polled again after it already yielded the outcome
    #[error("Outcome of walk '{path}' was already taken")]
    OutcomeTaken { path: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl WalkerError {
    /// Path of the task that observed the failure, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            WalkerError::NotFound { path }
            | WalkerError::Io { path, .. }
            | WalkerError::Runtime { path, .. }
            | WalkerError::Rejected { path }
            | WalkerError::Abandoned { path }
            | WalkerError::OutcomeTaken { path } => Some(path),
            WalkerError::Config(_) => None,
        }
    }

    /// Returns true if this is a not-found failure for exactly `path`
    ///
    /// Comparing against the walk root tells a missing root apart from a
    /// subdirectory that vanished mid-walk.
    pub fn is_not_found_at(&self, path: &str) -> bool {
        matches!(self, WalkerError::NotFound { path: p } if p == path)
    }
}

/// Errors raised by a namespace provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Path does not exist
    #[error("Path not found: '{path}'")]
    NotFound { path: String },

    /// Any other backend I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Provider-specific failure that is not an I/O condition
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Build a provider error from an I/O error, keeping not-found distinct
    pub fn from_io(path: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            ProviderError::NotFound {
                path: path.to_string(),
            }
        } else {
            ProviderError::Io(err)
        }
    }
}

/// Error a leaf callback may return
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An executor refused to run a job
///
/// The job is handed back so the submitter decides when it is dropped.
#[derive(Error)]
#[error("Executor rejected job: {reason}")]
pub struct RejectedJob {
    pub job: Job,
    pub reason: &'static str,
}

impl RejectedJob {
    pub fn new(job: Job, reason: &'static str) -> Self {
        Self { job, reason }
    }
}

impl fmt::Debug for RejectedJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectedJob")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Executor construction errors
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// Worker thread could not be spawned
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid block size
    #[error("Invalid block size {size}: must be at least {min} bytes")]
    InvalidBlockSize { size: u64, min: u64 },

    /// Failed to build the async runtime
    #[error("Failed to build runtime: {0}")]
    Runtime(String),
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for ProviderError
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Map a provider failure observed by the task listing `path`
///
/// Not-found conditions always carry the task's own path, even when the
/// provider reported a different one.
pub fn classify_provider_error(path: &str, err: ProviderError) -> WalkerError {
    match err {
        ProviderError::NotFound { .. } => WalkerError::NotFound {
            path: path.to_string(),
        },
        ProviderError::Io(source) if source.kind() == io::ErrorKind::NotFound => {
            WalkerError::NotFound {
                path: path.to_string(),
            }
        }
        ProviderError::Io(source) => WalkerError::Io {
            path: path.to_string(),
            source,
        },
        ProviderError::Other(message) => WalkerError::Runtime {
            path: path.to_string(),
            message,
        },
    }
}

/// Map a callback failure raised inside the task listing `path`
pub fn classify_callback_error(path: &str, err: CallbackError) -> WalkerError {
    let err = match err.downcast::<WalkerError>() {
        Ok(walker_err) => return *walker_err,
        Err(other) => other,
    };
    let err = match err.downcast::<ProviderError>() {
        Ok(provider_err) => return classify_provider_error(path, *provider_err),
        Err(other) => other,
    };
    match err.downcast::<io::Error>() {
        Ok(io_err) => classify_provider_error(path, ProviderError::Io(*io_err)),
        Err(other) => WalkerError::Runtime {
            path: path.to_string(),
            message: other.to_string(),
        },
    }
}

/// Map a panic payload caught inside the task listing `path`
pub fn classify_panic(path: &str, payload: Box<dyn Any + Send>) -> WalkerError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    };
    WalkerError::Runtime {
        path: path.to_string(),
        message: format!("panic: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_not_found_uses_task_path() {
        let err = ProviderError::NotFound {
            path: "/other".into(),
        };
        let walker_err = classify_provider_error("/data/part=1", err);
        assert!(walker_err.is_not_found_at("/data/part=1"));
        assert!(!walker_err.is_not_found_at("/other"));
    }

    #[test]
    fn test_io_not_found_kind_is_not_found() {
        let err = ProviderError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(classify_provider_error("/a", err).is_not_found_at("/a"));

        let err = ProviderError::from_io("/b", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, ProviderError::NotFound { ref path } if path == "/b"));
    }

    #[test]
    fn test_io_error_classification() {
        let err = ProviderError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let walker_err = classify_provider_error("/a", err);
        assert!(matches!(walker_err, WalkerError::Io { ref path, .. } if path == "/a"));
        assert_eq!(walker_err.path(), Some("/a"));
    }

    #[test]
    fn test_callback_error_classification() {
        let io_err: CallbackError = Box::new(io::Error::new(io::ErrorKind::Other, "disk"));
        assert!(matches!(
            classify_callback_error("/x", io_err),
            WalkerError::Io { .. }
        ));

        let custom: CallbackError = "bad record".into();
        match classify_callback_error("/x", custom) {
            WalkerError::Runtime { path, message } => {
                assert_eq!(path, "/x");
                assert_eq!(message, "bad record");
            }
            other => panic!("unexpected error: {other}"),
        }

        let passthrough: CallbackError = Box::new(WalkerError::NotFound {
            path: "/inner".into(),
        });
        assert!(classify_callback_error("/x", passthrough).is_not_found_at("/inner"));
    }

    #[test]
    fn test_panic_classification() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        match classify_panic("/p", payload) {
            WalkerError::Runtime { message, .. } => assert_eq!(message, "panic: boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::InvalidWorkerCount { count: 0, max: 512 };
        let walker_err: WalkerError = config_err.into();
        assert!(matches!(walker_err, WalkerError::Config(_)));
        assert_eq!(walker_err.path(), None);
    }
}
