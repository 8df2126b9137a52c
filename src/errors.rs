//! Error types for the coreference pipeline.
//!
//! Every failure names the stage or method it came from together with the
//! underlying cause. Cancellation is carried as an error variant so it can
//! travel up the call stack, but callers should check
//! [`CorefError::is_cancelled`] and treat it as a clean exit.

use thiserror::Error;

/// Error returned by external capabilities (cleaners, methods).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while preparing a corpus or running methods.
#[derive(Debug, Error)]
pub enum CorefError {
    /// The user dismissed an interactive selection.
    #[error("{stage}: cancelled by user")]
    UserCancelled { stage: &'static str },

    /// A picked file or folder was rejected and no valid pick followed.
    #[error("{stage}: invalid input: {message}")]
    InvalidInput {
        stage: &'static str,
        message: String,
    },

    /// An operation ran before its required predecessor.
    #[error("{operation}: invalid state: {message}")]
    InvalidState {
        operation: &'static str,
        message: String,
    },

    /// No method is registered under this name.
    #[error("unknown method: {name}")]
    UnknownMethod { name: String },

    /// The text cleaner reported an error or produced nothing usable.
    #[error("cleaning {file} failed: {message}")]
    CleaningFailed { file: String, message: String },

    /// A method reported an error or produced no readable artifact.
    #[error("method {name} failed: {source}")]
    MethodExecutionFailed {
        name: String,
        #[source]
        source: BoxError,
    },

    /// An artifact could not be read or written.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The pipeline configuration could not be loaded.
    #[error("failed to load config {path}: {message}")]
    Config { path: String, message: String },
}

impl CorefError {
    /// Whether this error is a user cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CorefError::UserCancelled { .. })
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CorefError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type CorefResult<T> = Result<T, CorefError>;
