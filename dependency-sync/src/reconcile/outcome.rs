//! Reconciliation outcomes.

use crate::changes::DependencyChange;
use crate::pending::PendingStatus;
use crate::pull_requests::PrStatus;

/// What reconciling one repository achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No candidate change modified the working tree.
    NoChanges,

    /// Valid changes were published.
    Applied {
        /// Changes committed.
        applied: Vec<DependencyChange>,
        /// Changes deferred to the pending updates issue.
        deferred: Vec<DependencyChange>,
        /// Pending updates issue result; `None` without a host.
        pending: Option<PendingStatus>,
        /// Pull request (or local commit) result.
        pull_request: PrStatus,
    },

    /// Changes were applied and validated, then reverted without publishing.
    DryRun {
        /// Changes that would be committed.
        applied: Vec<DependencyChange>,
        /// Changes that would be deferred.
        deferred: Vec<DependencyChange>,
    },

    /// Every applied change failed validation.
    AllDeferred {
        /// Changes deferred to the pending updates issue.
        deferred: Vec<DependencyChange>,
        /// Pending updates issue result; `None` without a host or in a dry run.
        pending: Option<PendingStatus>,
    },
}

impl ReconcileOutcome {
    /// Returns true if the run was a no-op or applied at least one change.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::AllDeferred { .. })
    }

    /// Changes committed (or that would be, in a dry run).
    #[must_use]
    pub fn applied(&self) -> &[DependencyChange] {
        match self {
            Self::Applied { applied, .. } | Self::DryRun { applied, .. } => applied,
            _ => &[],
        }
    }

    /// Changes deferred to the pending updates issue.
    #[must_use]
    pub fn deferred(&self) -> &[DependencyChange] {
        match self {
            Self::NoChanges => &[],
            Self::Applied { deferred, .. }
            | Self::DryRun { deferred, .. }
            | Self::AllDeferred { deferred, .. } => deferred,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_deferred_is_the_only_failure() {
        let bar = DependencyChange::new("mvn", "bar", "9.9.9");
        assert!(ReconcileOutcome::NoChanges.is_success());
        assert!(ReconcileOutcome::DryRun {
            applied: vec![],
            deferred: vec![bar.clone()],
        }
        .is_success());

        let outcome = ReconcileOutcome::AllDeferred {
            deferred: vec![bar.clone()],
            pending: None,
        };
        assert!(!outcome.is_success());
        assert!(outcome.applied().is_empty());
        assert_eq!(outcome.deferred(), &[bar]);
    }
}
