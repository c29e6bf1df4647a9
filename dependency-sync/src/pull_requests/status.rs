//! Pull request status types.

use serde::Serialize;

/// Outcome of synchronizing the pull request of a change-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrStatus {
    /// New pull request opened.
    Created {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },

    /// Existing pull request rewritten in place.
    Updated {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },

    /// Existing pull request already up to date.
    Unchanged {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },

    /// Commit is local only; pushing it failed.
    PushFailed {
        /// Branch that could not be pushed.
        branch: String,
        /// Error message.
        error: String,
    },

    /// Committed on a local branch; there is no host to open a pull request on.
    Committed {
        /// Local branch holding the commit.
        branch: String,
    },

    /// Nothing was published.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },
}

impl PrStatus {
    /// Returns the status as a string for summaries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Unchanged { .. } => "unchanged",
            Self::PushFailed { .. } => "push_failed",
            Self::Committed { .. } => "committed",
            Self::Skipped { .. } => "skipped",
        }
    }

    /// Returns the PR URL if one exists.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Created { url, .. } | Self::Updated { url, .. } | Self::Unchanged { url, .. } => {
                Some(url)
            }
            _ => None,
        }
    }
}
