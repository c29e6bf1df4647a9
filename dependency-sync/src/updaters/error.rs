//! Updater error types.

use thiserror::Error;

/// Errors raised by ecosystem updaters.
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// Failed to read or write a manifest.
    #[error("Failed to access manifest '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The manifest pattern could not be rendered or compiled.
    #[error("Invalid manifest pattern for {ecosystem}: {message}")]
    InvalidPattern { ecosystem: String, message: String },

    /// The dependency check command could not be started.
    #[error("Failed to run dependency check '{command}': {message}")]
    CheckFailed { command: String, message: String },
}
