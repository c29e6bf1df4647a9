//! Keeping exactly one pull request per change-set.
//!
//! Open pull requests are matched by their logical title prefix. A missing
//! pull request is opened on a fresh branch; an existing one is left alone
//! while it is current and mergeable, and otherwise rewritten in place by
//! force pushing to its existing head branch so review history survives.

mod error;
mod status;

pub use error::PrError;
pub use status::PrStatus;

use crate::config::PullRequestSettings;
use crate::host::{CollaborationHost, PullRequestRecord};
use crate::templates::{generate_branch_name, matches_title_prefix};
use crate::vcs::{validate_branch_name, VersionControl};
use tracing::{debug, info, info_span, warn, Instrument};

/// Comment posted before rewriting a conflicting pull request.
const REBASE_COMMENT: &str = "Rebasing due to merge conflicts.";

/// Where the change-set's pull request currently stands on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestState {
    /// No open pull request carries the logical title prefix.
    Absent,

    /// An open pull request already has the exact title.
    OpenSameTitle(PullRequestRecord),

    /// An open pull request has the prefix but describes other changes.
    OpenDifferentTitle(PullRequestRecord),
}

/// Classifies open pull requests against the change-set's prefix and title.
#[must_use]
pub fn find_pull_request(
    pull_requests: Vec<PullRequestRecord>,
    prefix: &str,
    title: &str,
) -> PullRequestState {
    match pull_requests
        .into_iter()
        .find(|pr| matches_title_prefix(&pr.title, prefix))
    {
        None => PullRequestState::Absent,
        Some(pr) if pr.title == title => PullRequestState::OpenSameTitle(pr),
        Some(pr) => PullRequestState::OpenDifferentTitle(pr),
    }
}

/// Rendered text for the change-set's pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContent {
    /// Logical title prefix.
    pub prefix: String,

    /// Full title.
    pub title: String,

    /// Body of a new pull request.
    pub body: String,

    /// Comment posted when the pull request is opened or retitled.
    pub comment: String,

    /// Commit message.
    pub commit_message: String,
}

/// Publishes the working tree as the change-set's pull request.
pub struct PullRequestSynchronizer<'a> {
    host: &'a dyn CollaborationHost,
    vcs: &'a dyn VersionControl,
    settings: &'a PullRequestSettings,
    base_branch: &'a str,
}

impl<'a> PullRequestSynchronizer<'a> {
    /// Creates a synchronizer targeting `base_branch`.
    pub fn new(
        host: &'a dyn CollaborationHost,
        vcs: &'a dyn VersionControl,
        settings: &'a PullRequestSettings,
        base_branch: &'a str,
    ) -> Self {
        Self {
            host,
            vcs,
            settings,
            base_branch,
        }
    }

    /// Opens, refreshes or leaves alone the pull request for `content`.
    ///
    /// # Errors
    ///
    /// Returns [`PrError`] on host failures and on working tree failures other
    /// than pushing; push failures are reported as [`PrStatus::PushFailed`].
    pub async fn synchronize(&self, content: &PullRequestContent) -> Result<PrStatus, PrError> {
        let span = info_span!("pull_request", repo = %self.host.repository());

        async {
            let open = self.host.list_open_pull_requests().await?;
            match find_pull_request(open, &content.prefix, &content.title) {
                PullRequestState::Absent => self.open(content).await,
                PullRequestState::OpenSameTitle(pr) => {
                    if !self.settings.rebase || self.host.is_mergeable(pr.number).await? {
                        info!(pr_number = pr.number, "Pull request already up to date");
                        self.vcs.stash().await?;
                        return Ok(PrStatus::Unchanged {
                            number: pr.number,
                            url: pr.html_url,
                        });
                    }
                    info!(pr_number = pr.number, "Pull request has conflicts, rebasing");
                    self.host
                        .comment_on_pull_request(pr.number, REBASE_COMMENT)
                        .await?;
                    self.rewrite(&pr, content).await
                }
                PullRequestState::OpenDifferentTitle(pr) => {
                    info!(
                        pr_number = pr.number,
                        old_title = %pr.title,
                        new_title = %content.title,
                        "Replacing pull request content"
                    );
                    self.host
                        .set_pull_request_title(pr.number, &content.title)
                        .await?;
                    self.host
                        .comment_on_pull_request(pr.number, &content.comment)
                        .await?;
                    self.rewrite(&pr, content).await
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Opens a new pull request from a freshly generated branch.
    async fn open(&self, content: &PullRequestContent) -> Result<PrStatus, PrError> {
        let branch = generate_branch_name(&self.settings.branch_prefix);
        validate_branch_name(&branch)?;

        if !self.commit_on_branch(&branch, &content.commit_message).await? {
            return Ok(PrStatus::Skipped {
                reason: "nothing to commit".to_string(),
            });
        }

        if let Err(status) = self.push(&branch, &branch).await {
            return Ok(status);
        }

        let pr = self
            .host
            .create_pull_request(&content.title, &branch, self.base_branch, &content.body)
            .await?;
        info!(pr_number = pr.number, url = %pr.html_url, "Created pull request");

        self.host
            .comment_on_pull_request(pr.number, &content.comment)
            .await?;
        if !self.settings.labels.is_empty() {
            self.host.set_labels(pr.number, &self.settings.labels).await?;
        }

        Ok(PrStatus::Created {
            number: pr.number,
            url: pr.html_url,
        })
    }

    /// Replaces the content of `pr` by force pushing to its head branch.
    async fn rewrite(
        &self,
        pr: &PullRequestRecord,
        content: &PullRequestContent,
    ) -> Result<PrStatus, PrError> {
        let branch = pr.head_ref.as_str();
        validate_branch_name(branch)?;

        if let Err(e) = self.vcs.delete_branch(branch).await {
            debug!(branch, error = %e, "No local branch to remove");
        }

        if !self.commit_on_branch(branch, &content.commit_message).await? {
            return Ok(PrStatus::Skipped {
                reason: "nothing to commit".to_string(),
            });
        }

        if let Err(status) = self.push(branch, branch).await {
            return Ok(status);
        }

        info!(pr_number = pr.number, url = %pr.html_url, "Updated pull request");
        Ok(PrStatus::Updated {
            number: pr.number,
            url: pr.html_url.clone(),
        })
    }

    /// Checks out `branch` and commits the working tree onto it.
    async fn commit_on_branch(&self, branch: &str, message: &str) -> Result<bool, PrError> {
        self.vcs.create_branch(branch).await?;
        Ok(self.vcs.commit_all(message).await?)
    }

    /// Pins the remote URL and force pushes, mapping failure to [`PrStatus::PushFailed`].
    async fn push(&self, local: &str, remote: &str) -> Result<(), PrStatus> {
        let url = self.host.ssh_url();
        if let Err(e) = self.vcs.set_remote_url(&url).await {
            warn!(url = %url, error = %e, "Could not set the remote URL");
        }

        self.vcs.push_force(local, remote).await.map_err(|e| {
            warn!(branch = %local, remote_ref = %remote, error = %e, "Failed to push branch");
            PrStatus::PushFailed {
                branch: local.to_string(),
                error: e.to_string(),
            }
        })
    }
}
