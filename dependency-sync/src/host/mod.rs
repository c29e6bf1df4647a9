//! Remote collaboration host (pull requests and issues).
//!
//! Every host operation the reconciler needs is expressed by
//! [`CollaborationHost`]; [`GitHubHost`] is the shipped implementation.

mod error;
mod github;
mod records;

pub use error::HostError;
pub use github::GitHubHost;
pub use records::{IssueRecord, PullRequestRecord};

use async_trait::async_trait;

/// Pull request and issue operations on one remote repository.
#[async_trait]
pub trait CollaborationHost: Send + Sync {
    /// Repository name used in log lines, e.g. `owner/name`.
    fn repository(&self) -> &str;

    /// Canonical SSH URL pushes go to.
    fn ssh_url(&self) -> String;

    /// Lists open pull requests.
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestRecord>, HostError>;

    /// Opens a pull request from `head` into `base`.
    async fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequestRecord, HostError>;

    /// Posts a comment on a pull request.
    async fn comment_on_pull_request(&self, number: u64, text: &str) -> Result<(), HostError>;

    /// Changes a pull request's title.
    async fn set_pull_request_title(&self, number: u64, title: &str) -> Result<(), HostError>;

    /// Replaces a pull request's labels.
    async fn set_labels(&self, number: u64, labels: &[String]) -> Result<(), HostError>;

    /// Returns whether a pull request merges cleanly into its base.
    async fn is_mergeable(&self, number: u64) -> Result<bool, HostError>;

    /// Lists open issues carrying all of `labels`.
    async fn list_open_issues(&self, labels: &[String]) -> Result<Vec<IssueRecord>, HostError>;

    /// Returns the bodies of an issue's comments, oldest first.
    async fn issue_comments(&self, number: u64) -> Result<Vec<String>, HostError>;

    /// Opens an issue.
    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<IssueRecord, HostError>;

    /// Posts a comment on an issue.
    async fn comment_on_issue(&self, number: u64, text: &str) -> Result<(), HostError>;

    /// Closes an issue.
    async fn close_issue(&self, number: u64) -> Result<(), HostError>;
}
