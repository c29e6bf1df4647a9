//! Version control error types.

use thiserror::Error;

/// Errors raised by version control operations.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The command could not be started.
    #[error("Failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exited with a non-zero status.
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A branch name is not a valid git reference.
    #[error("Invalid branch name '{name}': {message}")]
    InvalidBranch { name: String, message: String },
}
