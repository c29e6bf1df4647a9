//! Settings loading.
//!
//! This module parses the TOML settings file describing the ecosystems the
//! tool can update, the repositories it reconciles and how pull requests and
//! pending-update issues are written.

mod ecosystem;
mod error;
mod pending;
mod pull_request;
mod repository;

pub use ecosystem::EcosystemConfig;
pub use error::ConfigError;
pub use pending::{default_issue_body_format, PendingSettings};
pub use pull_request::{
    default_body_format, default_comment_format, default_commit_format, PullRequestSettings,
};
pub use repository::RepositoryConfig;

use crate::vcs::validate_branch_name;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable overriding [`PendingSettings::check_dependencies`].
pub const CHECK_DEPENDENCIES_ENV: &str = "DEPENDENCY_SYNC_CHECK_DEPENDENCIES";

/// Parsed settings file.
///
/// ```toml
/// [pull-request]
/// labels = ["dependencies"]
///
/// [[ecosystem]]
/// id = "npm"
/// files = ["package.json"]
/// pattern = '"{{dependency}}"\s*:\s*"(?P<version>[^"]+)"'
///
/// [[repository]]
/// path = "work/widgets"
/// github = "acme/widgets"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Pull request settings.
    #[serde(default)]
    pub pull_request: PullRequestSettings,

    /// Pending updates settings.
    #[serde(default)]
    pub pending: PendingSettings,

    /// Ecosystems with manifest rewriting rules.
    #[serde(default, rename = "ecosystem")]
    pub ecosystems: Vec<EcosystemConfig>,

    /// Repositories to reconcile.
    #[serde(default, rename = "repository")]
    pub repositories: Vec<RepositoryConfig>,
}

impl Settings {
    /// Loads and validates a settings file.
    ///
    /// Relative repository paths are resolved against the file's directory and
    /// [`CHECK_DEPENDENCIES_ENV`] takes precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, malformed or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading settings");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut settings: Settings =
            toml::from_str(&content).map_err(|e| ConfigError::TomlError {
                path: path.display().to_string(),
                source: e,
            })?;

        settings.validate(path)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for repository in &mut settings.repositories {
            if repository.path.is_relative() {
                repository.path = base.join(&repository.path);
            }
        }

        let mut paths = HashSet::new();
        for repository in &settings.repositories {
            if !paths.insert(repository.path.as_path()) {
                return Err(ConfigError::ValidationError {
                    path: path.display().to_string(),
                    message: format!(
                        "repository path '{}' is listed twice",
                        repository.path.display()
                    ),
                });
            }
        }

        if let Some(check) = resolve_check_dependencies() {
            debug!(check, "Dependency checks overridden from environment");
            settings.pending.check_dependencies = check;
        }

        Ok(settings)
    }

    /// Validates settings, naming `path` in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first problem found.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        if self.pull_request.title_prefix.trim().is_empty() {
            return Err(invalid("pull-request.title-prefix must not be empty".to_string()));
        }
        validate_branch_name(&self.pull_request.branch_prefix)
            .map_err(|e| invalid(format!("pull-request.branch-prefix: {e}")))?;

        if self.pending.issue_title.trim().is_empty() {
            return Err(invalid("pending.issue-title must not be empty".to_string()));
        }

        let mut ids = HashSet::new();
        for ecosystem in &self.ecosystems {
            if ecosystem.id.trim().is_empty() || ecosystem.id.contains(':') {
                return Err(invalid(format!(
                    "ecosystem id '{}' must be non-empty and must not contain ':'",
                    ecosystem.id
                )));
            }
            if !ids.insert(ecosystem.id.as_str()) {
                return Err(invalid(format!("ecosystem '{}' is defined twice", ecosystem.id)));
            }
            if ecosystem.files.is_empty() {
                return Err(invalid(format!("ecosystem '{}' lists no files", ecosystem.id)));
            }
            if !ecosystem.pattern.contains("(?P<version>") && !ecosystem.pattern.contains("(?<version>") {
                return Err(invalid(format!(
                    "ecosystem '{}' pattern has no 'version' group",
                    ecosystem.id
                )));
            }
        }

        for repository in &self.repositories {
            if repository.github.is_some() && repository.github_repo().is_none() {
                return Err(invalid(format!(
                    "repository github '{}' must be in owner/name form",
                    repository.github.as_deref().unwrap_or_default()
                )));
            }
            validate_branch_name(&repository.base_branch)
                .map_err(|e| invalid(format!("repository base-branch: {e}")))?;
        }

        Ok(())
    }
}

/// Reads [`CHECK_DEPENDENCIES_ENV`], ignoring unparseable values.
fn resolve_check_dependencies() -> Option<bool> {
    let value = std::env::var(CHECK_DEPENDENCIES_ENV).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        other => {
            warn!(value = other, "Ignoring invalid {CHECK_DEPENDENCIES_ENV}");
            None
        }
    }
}
