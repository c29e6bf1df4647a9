//! `[[repository]]` entries.

use serde::Deserialize;
use std::path::PathBuf;

/// A working tree to reconcile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepositoryConfig {
    /// Path of the working tree; relative paths are resolved against the settings file.
    pub path: PathBuf,

    /// GitHub repository in `owner/name` form. Absent for plain git repositories.
    pub github: Option<String>,

    /// Branch pull requests target.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Logical change-set name used in pull request titles.
    #[serde(default = "default_topic")]
    pub topic: String,
}

impl RepositoryConfig {
    /// Splits [`github`](Self::github) into owner and name.
    #[must_use]
    pub fn github_repo(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.github.as_deref()?.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((owner, name))
    }

    /// Name used in log lines and summaries.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.github
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

pub(crate) fn default_base_branch() -> String {
    "main".to_string()
}

pub(crate) fn default_topic() -> String {
    "dependencies".to_string()
}
