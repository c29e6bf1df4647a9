//! Pending updates issue status types.

use serde::Serialize;

/// What reconciling the pending updates issue did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PendingStatus {
    /// Deferred set unchanged; nothing was written.
    Unchanged,

    /// Issue created for newly deferred changes.
    Created {
        /// Issue number.
        number: u64,
        /// Issue URL.
        url: String,
    },

    /// Existing issue received the new deferred set.
    Updated {
        /// Issue number.
        number: u64,
        /// Issue URL.
        url: String,
    },

    /// Nothing is deferred any more; the issue was closed.
    Closed {
        /// Issue number.
        number: u64,
    },
}

impl PendingStatus {
    /// Returns the status as a string for summaries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Closed { .. } => "closed",
        }
    }
}
