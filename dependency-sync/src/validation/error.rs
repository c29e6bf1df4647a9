//! Validation error types.

use crate::updaters::UpdaterError;
use thiserror::Error;

/// Errors that abort validation of a change-set.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No updater is registered for an ecosystem present in the change-set.
    #[error("No updater registered for ecosystem '{ecosystem}' ({changes})")]
    UpdaterNotFound { ecosystem: String, changes: String },

    /// An updater failed while checking its changes.
    #[error("Dependency check for '{ecosystem}' failed: {source}")]
    Updater {
        ecosystem: String,
        #[source]
        source: UpdaterError,
    },
}
