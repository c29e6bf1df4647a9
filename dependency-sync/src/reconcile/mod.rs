//! Reconciling one working tree against a proposed change-set.
//!
//! A run prepares a clean working tree on the base branch, merges in the
//! changes deferred by earlier runs, applies and validates them, reverts and
//! re-applies only the valid subset when something fails validation, keeps the
//! pending updates issue in line with what was deferred and finally publishes
//! the valid changes as a pull request (or a local commit for plain git
//! repositories).

mod error;
mod outcome;

pub use error::ReconcileError;
pub use outcome::ReconcileOutcome;

use crate::apply::apply_changes;
use crate::changes::{combine_pending, describe_changes, DependencyChange};
use crate::config::{RepositoryConfig, Settings};
use crate::host::CollaborationHost;
use crate::pending::{PendingChangeStore, PendingChanges};
use crate::pull_requests::{PrStatus, PullRequestContent, PullRequestSynchronizer};
use crate::templates::{
    generate_branch_name, generate_pr_title, generate_title_prefix, ChangeSummary,
    TemplateRenderer,
};
use crate::updaters::{UpdateContext, UpdaterRegistry};
use crate::validation::{validate_changes, ValidationResult};
use crate::vcs::{validate_branch_name, VersionControl};
use tracing::{debug, info, info_span, warn, Instrument};

/// Drives one repository from a proposed change-set to a published result.
pub struct Reconciler<'a> {
    registry: &'a UpdaterRegistry,
    vcs: &'a dyn VersionControl,
    host: Option<&'a dyn CollaborationHost>,
    settings: &'a Settings,
    repository: &'a RepositoryConfig,
    renderer: &'a TemplateRenderer,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler for a plain git repository.
    pub fn new(
        registry: &'a UpdaterRegistry,
        vcs: &'a dyn VersionControl,
        settings: &'a Settings,
        repository: &'a RepositoryConfig,
        renderer: &'a TemplateRenderer,
    ) -> Self {
        Self {
            registry,
            vcs,
            host: None,
            settings,
            repository,
            renderer,
            dry_run: false,
        }
    }

    /// Publishes through `host` instead of committing locally.
    #[must_use]
    pub fn with_host(mut self, host: &'a dyn CollaborationHost) -> Self {
        self.host = Some(host);
        self
    }

    /// Reverts instead of publishing.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconciles the repository against `proposed`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] if the working tree cannot be prepared or
    /// reverted, an ecosystem has no updater, an updater fails, a host call
    /// fails, or re-applying the valid changes modifies nothing.
    pub async fn reconcile(
        &self,
        proposed: &[DependencyChange],
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let repo = self.repository.display_name();
        let span = info_span!("reconcile", repo = %repo);

        async {
            self.prepare().await?;

            match self.reconcile_prepared(&repo, proposed).await {
                Ok(outcome) => Ok(outcome),
                Err(e) => {
                    if let Err(revert) = self.vcs.stash().await {
                        warn!(error = %revert, "Could not revert the working tree");
                    }
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Everything after [`prepare`](Self::prepare); uncommitted edits are
    /// reverted by the caller when this fails.
    async fn reconcile_prepared(
        &self,
        repo: &str,
        proposed: &[DependencyChange],
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let previous = self.load_pending().await?;
        let candidates = combine_pending(proposed, &previous.changes);
        debug!(candidates = %describe_changes(&candidates), "Applying candidate changes");

        let ctx = UpdateContext::new(&self.repository.path);
        let applied = apply_changes(self.registry, &ctx, &candidates).await?;
        if applied.is_empty() {
            info!("No changes to apply");
            return Ok(ReconcileOutcome::NoChanges);
        }

        let validation = if self.settings.pending.check_dependencies {
            validate_changes(self.registry, &ctx, applied.changes()).await?
        } else {
            ValidationResult {
                valid: applied.changes().to_vec(),
                invalid: Vec::new(),
            }
        };

        let (valid, deferred) = if validation.has_invalid() {
            warn!(
                deferred = %describe_changes(&validation.invalid),
                "Reverting changes that failed validation"
            );
            self.vcs.stash().await?;

            let valid = if validation.valid.is_empty() {
                Vec::new()
            } else {
                let reapplied = apply_changes(self.registry, &ctx, &validation.valid).await?;
                if reapplied.is_empty() {
                    return Err(ReconcileError::ReapplyProducedNoChanges {
                        changes: describe_changes(&validation.valid),
                    });
                }
                reapplied.into_changes()
            };
            (valid, validation.invalid)
        } else {
            (applied.into_changes(), Vec::new())
        };

        if self.dry_run {
            info!(
                applied = %describe_changes(&valid),
                deferred = %describe_changes(&deferred),
                "Dry run, reverting working tree"
            );
            self.vcs.stash().await?;
            if valid.is_empty() {
                return Ok(ReconcileOutcome::AllDeferred {
                    deferred,
                    pending: None,
                });
            }
            return Ok(ReconcileOutcome::DryRun {
                applied: valid,
                deferred,
            });
        }

        let pending = match self.host {
            Some(host) => Some(
                PendingChangeStore::new(host, &self.settings.pending, self.renderer)
                    .reconcile(&deferred, &previous)
                    .await?,
            ),
            None => None,
        };

        if valid.is_empty() {
            warn!(
                deferred = %describe_changes(&deferred),
                "Every change failed validation"
            );
            return Ok(ReconcileOutcome::AllDeferred { deferred, pending });
        }

        let content = self.render_content(repo, &valid, &deferred)?;
        let pull_request = match self.host {
            Some(host) => {
                PullRequestSynchronizer::new(
                    host,
                    self.vcs,
                    &self.settings.pull_request,
                    &self.repository.base_branch,
                )
                .synchronize(&content)
                .await?
            }
            None => self.commit_locally(&content).await?,
        };

        Ok(ReconcileOutcome::Applied {
            applied: valid,
            deferred,
            pending,
            pull_request,
        })
    }

    /// Discards leftovers of earlier runs and checks out the base branch.
    async fn prepare(&self) -> Result<(), ReconcileError> {
        self.vcs.stash().await?;
        self.vcs.checkout_base(&self.repository.base_branch).await?;
        Ok(())
    }

    async fn load_pending(&self) -> Result<PendingChanges, ReconcileError> {
        match self.host {
            Some(host) => Ok(
                PendingChangeStore::new(host, &self.settings.pending, self.renderer)
                    .load()
                    .await?,
            ),
            None => Ok(PendingChanges::default()),
        }
    }

    fn render_content(
        &self,
        repo: &str,
        valid: &[DependencyChange],
        deferred: &[DependencyChange],
    ) -> Result<PullRequestContent, ReconcileError> {
        let mut valid = valid.to_vec();
        valid.sort();
        let mut deferred = deferred.to_vec();
        deferred.sort();

        let settings = &self.settings.pull_request;
        let prefix = generate_title_prefix(&settings.title_prefix, &self.repository.topic);
        let title = generate_pr_title(&prefix, &valid);
        let summary = ChangeSummary {
            repository: repo,
            prefix: &prefix,
            title: &title,
            changes: &valid,
            deferred: &deferred,
        };

        let body = self.renderer.render_summary(&settings.body_format, &summary)?;
        let comment = self
            .renderer
            .render_summary(&settings.comment_format, &summary)?;
        let commit_message = self
            .renderer
            .render_summary(&settings.commit_format, &summary)?;

        Ok(PullRequestContent {
            prefix,
            title,
            body,
            comment,
            commit_message,
        })
    }

    /// Commits the working tree on a fresh branch of a plain git repository.
    async fn commit_locally(&self, content: &PullRequestContent) -> Result<PrStatus, ReconcileError> {
        let branch = generate_branch_name(&self.settings.pull_request.branch_prefix);
        validate_branch_name(&branch)?;

        self.vcs.create_branch(&branch).await?;
        if !self.vcs.commit_all(&content.commit_message).await? {
            return Ok(PrStatus::Skipped {
                reason: "nothing to commit".to_string(),
            });
        }

        info!(branch = %branch, "Committed changes locally");
        Ok(PrStatus::Committed { branch })
    }
}
