//! Change application error types.

use crate::updaters::UpdaterError;
use thiserror::Error;

/// Errors that abort applying a change-set.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// No updater is registered for the change's ecosystem.
    #[error("No updater registered for ecosystem '{ecosystem}' (change {change})")]
    UpdaterNotFound { ecosystem: String, change: String },

    /// An updater failed to rewrite its manifests.
    #[error("Failed to apply {change}: {source}")]
    Updater {
        change: String,
        #[source]
        source: UpdaterError,
    },
}
