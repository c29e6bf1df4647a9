//! Run summary types.

use super::result::ProcessingResult;
use crate::pending::PendingStatus;
use crate::pull_requests::PrStatus;
use crate::reconcile::ReconcileOutcome;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of repositories processed.
    pub repositories_processed: usize,

    /// Repositories where nothing needed changing.
    pub no_changes: usize,

    /// Repositories with at least one applied change.
    pub applied: usize,

    /// Repositories where every change was deferred.
    pub deferred_only: usize,

    /// Number of PRs created.
    pub prs_created: usize,

    /// Number of PRs rewritten.
    pub prs_updated: usize,

    /// Number of PRs left as they were.
    pub prs_unchanged: usize,

    /// Number of branches that could not be pushed.
    pub prs_push_failed: usize,

    /// Number of local commits in plain git repositories.
    pub local_commits: usize,

    /// Number of pending updates issues created.
    pub pending_created: usize,

    /// Number of pending updates issues updated.
    pub pending_updated: usize,

    /// Number of pending updates issues closed.
    pub pending_closed: usize,

    /// Repositories whose reconciliation aborted.
    pub failed: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: &ProcessingResult) {
        self.repositories_processed += 1;
        let outcome = match result {
            ProcessingResult::Success { outcome, .. } => outcome,
            ProcessingResult::Failed { .. } => {
                self.failed += 1;
                return;
            }
        };

        match outcome {
            ReconcileOutcome::NoChanges => self.no_changes += 1,
            ReconcileOutcome::DryRun { .. } => self.applied += 1,
            ReconcileOutcome::AllDeferred { pending, .. } => {
                self.deferred_only += 1;
                self.record_pending(pending.as_ref());
            }
            ReconcileOutcome::Applied {
                pending,
                pull_request,
                ..
            } => {
                self.applied += 1;
                self.record_pending(pending.as_ref());
                match pull_request {
                    PrStatus::Created { .. } => self.prs_created += 1,
                    PrStatus::Updated { .. } => self.prs_updated += 1,
                    PrStatus::Unchanged { .. } => self.prs_unchanged += 1,
                    PrStatus::PushFailed { .. } => self.prs_push_failed += 1,
                    PrStatus::Committed { .. } => self.local_commits += 1,
                    PrStatus::Skipped { .. } => {}
                }
            }
        }
    }

    fn record_pending(&mut self, pending: Option<&PendingStatus>) {
        match pending {
            Some(PendingStatus::Created { .. }) => self.pending_created += 1,
            Some(PendingStatus::Updated { .. }) => self.pending_updated += 1,
            Some(PendingStatus::Closed { .. }) => self.pending_closed += 1,
            Some(PendingStatus::Unchanged) | None => {}
        }
    }

    /// Returns true if any repository failed or had every change deferred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.deferred_only > 0
    }

    /// Returns true if every repository succeeded.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}
