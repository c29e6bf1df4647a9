//! Runner configuration.

use crate::changes::DependencyChange;
use std::path::{Path, PathBuf};

/// Configuration for a reconciliation run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the settings file.
    settings_path: PathBuf,
    /// GitHub token used for API calls.
    token: Option<String>,
    /// Whether to revert instead of publishing.
    dry_run: bool,
    /// Maximum repositories reconciled at once.
    concurrency: usize,
    /// Optional TOML file of proposed changes.
    changes_path: Option<PathBuf>,
    /// Changes proposed on the command line.
    changes: Vec<DependencyChange>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(
        settings_path: PathBuf,
        token: Option<String>,
        dry_run: bool,
        concurrency: usize,
    ) -> Self {
        Self {
            settings_path,
            token,
            dry_run,
            concurrency: concurrency.max(1),
            changes_path: None,
            changes: Vec::new(),
        }
    }

    /// Reads proposed changes from a change file.
    #[must_use]
    pub fn with_changes_path(mut self, changes_path: PathBuf) -> Self {
        self.changes_path = Some(changes_path);
        self
    }

    /// Adds changes proposed directly.
    #[must_use]
    pub fn with_changes(mut self, changes: Vec<DependencyChange>) -> Self {
        self.changes.extend(changes);
        self
    }

    /// Returns the settings file path.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the max concurrent repositories.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the change file path, if any.
    pub fn changes_path(&self) -> Option<&Path> {
        self.changes_path.as_deref()
    }

    /// Returns the directly proposed changes.
    pub fn changes(&self) -> &[DependencyChange] {
        &self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrency_is_at_least_one() {
        let config = RunnerConfig::new(PathBuf::from("dependency-sync.toml"), None, false, 0);
        assert_eq!(config.concurrency(), 1);
    }

    #[test]
    fn collects_proposed_changes() {
        let config = RunnerConfig::new(PathBuf::from("dependency-sync.toml"), None, true, 4)
            .with_changes_path(PathBuf::from("changes.toml"))
            .with_changes(vec![DependencyChange::new("npm", "left-pad", "1.3.0")]);
        assert_eq!(config.changes_path(), Some(Path::new("changes.toml")));
        assert_eq!(config.changes().len(), 1);
        assert!(config.dry_run());
    }
}
