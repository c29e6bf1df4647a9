//! Reconciliation error types.

use crate::apply::ApplyError;
use crate::pending::PendingError;
use crate::pull_requests::PrError;
use crate::templates::TemplateError;
use crate::validation::ValidationError;
use crate::vcs::VcsError;
use thiserror::Error;

/// Errors that abort reconciling a repository.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Working tree could not be prepared or reverted.
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Applying changes failed.
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// Validating changes failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Pending updates issue could not be read or written.
    #[error(transparent)]
    Pending(#[from] PendingError),

    /// Pull request synchronization failed.
    #[error(transparent)]
    PullRequest(#[from] PrError),

    /// Pull request text could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Valid changes modified nothing after the working tree was reverted.
    #[error("Re-applying valid changes modified no files: {changes}")]
    ReapplyProducedNoChanges { changes: String },
}
