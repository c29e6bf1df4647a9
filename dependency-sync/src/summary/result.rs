//! Processing result types.

use crate::reconcile::ReconcileOutcome;

/// Result of processing a single repository.
#[derive(Debug, Clone)]
pub enum ProcessingResult {
    /// Reconciliation finished.
    Success {
        /// Repository name.
        repository: String,
        /// What reconciliation achieved.
        outcome: ReconcileOutcome,
    },

    /// Reconciliation aborted.
    Failed {
        /// Repository name.
        repository: String,
        /// Single-line diagnostic.
        error: String,
    },
}

impl ProcessingResult {
    /// Returns the repository name.
    #[must_use]
    pub fn repository(&self) -> &str {
        match self {
            Self::Success { repository, .. } | Self::Failed { repository, .. } => repository,
        }
    }
}
