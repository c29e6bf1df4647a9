//! `[pull-request]` settings.

use serde::Deserialize;

/// How pull requests are named, labelled and refreshed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PullRequestSettings {
    /// Leading part of every pull request title.
    pub title_prefix: String,

    /// Prefix of freshly generated branch names.
    pub branch_prefix: String,

    /// Labels applied to new pull requests.
    pub labels: Vec<String>,

    /// Whether conflicting pull requests with an unchanged title are rewritten.
    pub rebase: bool,

    /// Handlebars format for pull request bodies.
    pub body_format: String,

    /// Handlebars format for the comment posted when a pull request is opened or retitled.
    pub comment_format: String,

    /// Handlebars format for commit messages.
    pub commit_format: String,
}

impl Default for PullRequestSettings {
    fn default() -> Self {
        Self {
            title_prefix: "chore(deps): update".to_string(),
            branch_prefix: "dependency-sync".to_string(),
            labels: vec!["dependencies".to_string()],
            rebase: true,
            body_format: default_body_format(),
            comment_format: default_comment_format(),
            commit_format: default_commit_format(),
        }
    }
}

/// Default pull request body.
#[must_use]
pub fn default_body_format() -> String {
    r"Updates the following dependencies:

| Ecosystem | Dependency | Version |
| --- | --- | --- |
{{#each changes}}
| {{ecosystem}} | {{dependency}} | {{version}} |
{{/each}}
{{#if deferred}}

These updates failed validation and are tracked in the pending updates issue:

{{#each deferred}}
- {{ecosystem}} {{dependency}} {{version}}
{{/each}}
{{/if}}"
        .to_string()
}

/// Default comment explaining who maintains the pull request.
#[must_use]
pub fn default_comment_format() -> String {
    "This pull request is maintained by dependency-sync and is rewritten in place \
     when the proposed versions change. Current content: {{summary}}."
        .to_string()
}

/// Default commit message.
#[must_use]
pub fn default_commit_format() -> String {
    "{{title}}".to_string()
}
