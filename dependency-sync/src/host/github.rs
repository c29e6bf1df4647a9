//! [`CollaborationHost`] backed by the GitHub REST API.

use super::{CollaborationHost, HostError, IssueRecord, PullRequestRecord};
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::models::{issues::Issue, pulls::PullRequest, IssueState};
use octocrab::{params, Octocrab};
use tracing::debug;

/// Results per page for list endpoints.
const RESULTS_PER_PAGE: u8 = 100;

/// A single GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubHost {
    octocrab: Octocrab,
    owner: String,
    name: String,
    full_name: String,
}

impl GitHubHost {
    /// Creates a host for `owner/name`.
    pub fn new(octocrab: Octocrab, owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        let full_name = format!("{owner}/{name}");
        Self {
            octocrab,
            owner,
            name,
            full_name,
        }
    }
}

fn pull_request_record(pr: PullRequest) -> PullRequestRecord {
    PullRequestRecord {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        head_ref: pr.head.ref_field,
        html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
    }
}

fn issue_record(issue: Issue) -> IssueRecord {
    IssueRecord {
        number: issue.number,
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        html_url: issue.html_url.to_string(),
    }
}

#[async_trait]
impl CollaborationHost for GitHubHost {
    fn repository(&self) -> &str {
        &self.full_name
    }

    fn ssh_url(&self) -> String {
        format!("git@github.com:{}.git", self.full_name)
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestRecord>, HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let page = self
            .octocrab
            .pulls(&self.owner, &self.name)
            .list()
            .state(params::State::Open)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;
        let pulls = self.octocrab.all_pages(page).await?;
        debug!(repo = %self.full_name, count = pulls.len(), "Listed open pull requests");
        Ok(pulls.into_iter().map(pull_request_record).collect())
    }

    async fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequestRecord, HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let pr = self
            .octocrab
            .pulls(&self.owner, &self.name)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;
        Ok(pull_request_record(pr))
    }

    async fn comment_on_pull_request(&self, number: u64, text: &str) -> Result<(), HostError> {
        // Pull request conversation comments live on the issue endpoint.
        self.comment_on_issue(number, text).await
    }

    async fn set_pull_request_title(&self, number: u64, title: &str) -> Result<(), HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .pulls(&self.owner, &self.name)
            .update(number)
            .title(title)
            .send()
            .await?;
        Ok(())
    }

    async fn set_labels(&self, number: u64, labels: &[String]) -> Result<(), HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&self.owner, &self.name)
            .replace_all_labels(number, labels)
            .await?;
        Ok(())
    }

    async fn is_mergeable(&self, number: u64) -> Result<bool, HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let pr = self
            .octocrab
            .pulls(&self.owner, &self.name)
            .get(number)
            .await?;
        // GitHub computes mergeability lazily; unknown is not a conflict.
        Ok(pr.mergeable.unwrap_or(true))
    }

    async fn list_open_issues(&self, labels: &[String]) -> Result<Vec<IssueRecord>, HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let issues = self.octocrab.issues(&self.owner, &self.name);
        let mut request = issues
            .list()
            .state(params::State::Open)
            .per_page(RESULTS_PER_PAGE);
        if !labels.is_empty() {
            request = request.labels(labels);
        }
        let page = request.send().await?;
        let issues = self.octocrab.all_pages(page).await?;
        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(issue_record)
            .collect())
    }

    async fn issue_comments(&self, number: u64) -> Result<Vec<String>, HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let page = self
            .octocrab
            .issues(&self.owner, &self.name)
            .list_comments(number)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;
        let comments = self.octocrab.all_pages(page).await?;
        Ok(comments.into_iter().filter_map(|c| c.body).collect())
    }

    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<IssueRecord, HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let issue = self
            .octocrab
            .issues(&self.owner, &self.name)
            .create(title)
            .body(body)
            .labels(labels.to_vec())
            .send()
            .await?;
        Ok(issue_record(issue))
    }

    async fn comment_on_issue(&self, number: u64, text: &str) -> Result<(), HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&self.owner, &self.name)
            .create_comment(number, text)
            .await?;
        Ok(())
    }

    async fn close_issue(&self, number: u64) -> Result<(), HostError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&self.owner, &self.name)
            .update(number)
            .state(IssueState::Closed)
            .send()
            .await?;
        Ok(())
    }
}

