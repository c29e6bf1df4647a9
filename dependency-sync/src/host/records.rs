//! Pull request and issue records as seen on the host.

use serde::Serialize;

/// An open pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRecord {
    /// Pull request number.
    pub number: u64,

    /// Current title.
    pub title: String,

    /// Name of the head branch on the remote.
    pub head_ref: String,

    /// Web URL.
    pub html_url: String,
}

/// An open issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    /// Issue number.
    pub number: u64,

    /// Current title.
    pub title: String,

    /// Issue body.
    pub body: String,

    /// Web URL.
    pub html_url: String,
}
