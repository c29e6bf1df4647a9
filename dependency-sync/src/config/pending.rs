//! `[pending]` settings.

use serde::Deserialize;

/// How deferred changes are validated and tracked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PendingSettings {
    /// Title identifying the pending updates issue.
    pub issue_title: String,

    /// Labels applied to, and used to find, the pending updates issue.
    pub labels: Vec<String>,

    /// Whether applied changes are validated before they are published.
    pub check_dependencies: bool,

    /// Handlebars format for the pending updates issue body.
    pub issue_body_format: String,
}

impl Default for PendingSettings {
    fn default() -> Self {
        Self {
            issue_title: "Pending dependency updates".to_string(),
            labels: vec!["dependency-sync".to_string()],
            check_dependencies: true,
            issue_body_format: default_issue_body_format(),
        }
    }
}

/// Default pending updates issue body.
#[must_use]
pub fn default_issue_body_format() -> String {
    "Dependency updates for {{repository}} that failed validation are listed in the \
     comments below. They are retried on every run and this issue is closed once none remain."
        .to_string()
}
