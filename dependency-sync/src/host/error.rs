//! Collaboration host error types.

use thiserror::Error;

/// Errors raised by collaboration host operations.
#[derive(Debug, Error)]
pub enum HostError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The host rejected or failed a request.
    #[error("Host request failed: {message}")]
    RequestFailed { message: String },
}
