//! Pending updates error types.

use crate::host::HostError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur while loading or updating the pending updates issue.
#[derive(Debug, Error)]
pub enum PendingError {
    /// Host API error.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Issue body could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
