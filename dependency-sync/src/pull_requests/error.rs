//! Pull request error types.

use crate::host::HostError;
use crate::vcs::VcsError;
use thiserror::Error;

/// Errors that can occur while synchronizing a pull request.
#[derive(Debug, Error)]
pub enum PrError {
    /// Host API error.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Working tree operation failed.
    #[error(transparent)]
    Vcs(#[from] VcsError),
}
