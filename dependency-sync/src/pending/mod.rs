//! Durable tracking of deferred changes.
//!
//! Changes that fail validation are recorded in a single open issue so the
//! next run retries them without anyone re-proposing them. The issue is only
//! written when the deferred set actually changes, and closed once it drains.

mod error;
mod format;
mod status;

pub use error::PendingError;
pub use format::{
    decode_pending_changes, encode_pending_changes, latest_pending_changes, PENDING_MARKER,
};
pub use status::PendingStatus;

use crate::changes::{describe_changes, same_changes, DependencyChange};
use crate::config::PendingSettings;
use crate::host::{CollaborationHost, IssueRecord};
use crate::templates::TemplateRenderer;
use tracing::{debug, info, info_span, Instrument};

/// Comment posted when the last deferred change is resolved.
const CLOSING_COMMENT: &str = "No more pending dependency updates.";

/// Deferred changes as recorded on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChanges {
    /// The open pending updates issue, if any.
    pub issue: Option<IssueRecord>,

    /// Changes recorded in that issue.
    pub changes: Vec<DependencyChange>,
}

/// Reads and writes the pending updates issue of one repository.
pub struct PendingChangeStore<'a> {
    host: &'a dyn CollaborationHost,
    settings: &'a PendingSettings,
    renderer: &'a TemplateRenderer,
}

impl<'a> PendingChangeStore<'a> {
    /// Creates a store for the repository behind `host`.
    pub fn new(
        host: &'a dyn CollaborationHost,
        settings: &'a PendingSettings,
        renderer: &'a TemplateRenderer,
    ) -> Self {
        Self {
            host,
            settings,
            renderer,
        }
    }

    /// Loads the currently recorded deferred changes.
    ///
    /// # Errors
    ///
    /// Returns [`PendingError`] if the host cannot be queried.
    pub async fn load(&self) -> Result<PendingChanges, PendingError> {
        let issues = self.host.list_open_issues(&self.settings.labels).await?;
        let Some(issue) = issues
            .into_iter()
            .find(|issue| issue.title == self.settings.issue_title)
        else {
            debug!(repo = %self.host.repository(), "No pending updates issue");
            return Ok(PendingChanges::default());
        };

        let comments = self.host.issue_comments(issue.number).await?;
        let changes = latest_pending_changes(comments.iter().map(String::as_str))
            .or_else(|| decode_pending_changes(&issue.body))
            .unwrap_or_default();

        info!(
            repo = %self.host.repository(),
            issue_number = issue.number,
            pending = %describe_changes(&changes),
            "Loaded pending changes"
        );
        Ok(PendingChanges {
            issue: Some(issue),
            changes,
        })
    }

    /// Brings the pending updates issue in line with `deferred`.
    ///
    /// `previous` must be what [`load`](Self::load) returned at the start of the run.
    ///
    /// # Errors
    ///
    /// Returns [`PendingError`] if a host write fails.
    pub async fn reconcile(
        &self,
        deferred: &[DependencyChange],
        previous: &PendingChanges,
    ) -> Result<PendingStatus, PendingError> {
        let span = info_span!("pending", repo = %self.host.repository());

        async {
            if same_changes(deferred, &previous.changes) {
                if previous.issue.is_some() {
                    debug!("Pending changes unchanged so not modifying the issue");
                }
                return Ok(PendingStatus::Unchanged);
            }

            match (&previous.issue, deferred.is_empty()) {
                (None, true) => Ok(PendingStatus::Unchanged),
                (Some(issue), true) => {
                    info!(issue_number = issue.number, "Closing issue as no changes are pending");
                    self.host.comment_on_issue(issue.number, CLOSING_COMMENT).await?;
                    self.host.close_issue(issue.number).await?;
                    Ok(PendingStatus::Closed {
                        number: issue.number,
                    })
                }
                (None, false) => {
                    let body = self.renderer.render_issue_body(
                        &self.settings.issue_body_format,
                        self.host.repository(),
                    )?;
                    let issue = self
                        .host
                        .create_issue(&self.settings.issue_title, &body, &self.settings.labels)
                        .await?;
                    info!(issue_number = issue.number, url = %issue.html_url, "Created pending updates issue");

                    self.host
                        .comment_on_issue(issue.number, &encode_pending_changes(deferred))
                        .await?;
                    Ok(PendingStatus::Created {
                        number: issue.number,
                        url: issue.html_url,
                    })
                }
                (Some(issue), false) => {
                    info!(
                        issue_number = issue.number,
                        pending = %describe_changes(deferred),
                        "Updating pending updates issue"
                    );
                    self.host
                        .comment_on_issue(issue.number, &encode_pending_changes(deferred))
                        .await?;
                    Ok(PendingStatus::Updated {
                        number: issue.number,
                        url: issue.html_url.clone(),
                    })
                }
            }
        }
        .instrument(span)
        .await
    }
}
