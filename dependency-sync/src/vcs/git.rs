//! [`VersionControl`] backed by the `git` command line.

use super::{VcsError, VersionControl};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Default commit author name.
pub const DEFAULT_AUTHOR_NAME: &str = "Dependency Sync Bot";

/// Default commit author email.
pub const DEFAULT_AUTHOR_EMAIL: &str = "bot@dependency-sync";

/// Runs `git` inside a single working tree.
#[derive(Debug, Clone)]
pub struct GitExecutor {
    dir: PathBuf,
    remote: String,
    author_name: String,
    author_email: String,
}

impl GitExecutor {
    /// Creates an executor for the working tree at `dir`, pushing to `origin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            remote: "origin".to_string(),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: DEFAULT_AUTHOR_EMAIL.to_string(),
        }
    }

    /// Sets the commit author identity.
    #[must_use]
    pub fn with_author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author_name = name.into();
        self.author_email = email.into();
        self
    }

    /// Returns the working tree directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Runs a git command, returning its raw output.
    async fn output(&self, args: &[&str]) -> Result<Output, VcsError> {
        debug!(dir = %self.dir.display(), args = %args.join(" "), "Running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| VcsError::Spawn {
                command: format!("git {}", args.join(" ")),
                source: e,
            })
    }

    /// Runs a git command that records commits, with the configured identity.
    async fn run_as_author(&self, args: &[&str]) -> Result<Output, VcsError> {
        let name = format!("user.name={}", self.author_name);
        let email = format!("user.email={}", self.author_email);
        let mut full = vec!["-c", name.as_str(), "-c", email.as_str()];
        full.extend_from_slice(args);
        self.run(&full).await
    }

    /// Runs a git command, failing on a non-zero exit status.
    async fn run(&self, args: &[&str]) -> Result<Output, VcsError> {
        let output = self.output(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VcsError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl VersionControl for GitExecutor {
    async fn checkout_base(&self, base: &str) -> Result<(), VcsError> {
        self.run(&["checkout", base]).await.map(drop)
    }

    async fn create_branch(&self, name: &str) -> Result<(), VcsError> {
        self.run(&["checkout", "-b", name]).await.map(drop)
    }

    async fn delete_branch(&self, name: &str) -> Result<(), VcsError> {
        self.run(&["branch", "-D", name]).await.map(drop)
    }

    async fn commit_all(&self, message: &str) -> Result<bool, VcsError> {
        self.run(&["add", "-A"]).await?;

        let status = self.run(&["status", "--porcelain"]).await?;
        if String::from_utf8_lossy(&status.stdout).trim().is_empty() {
            debug!(dir = %self.dir.display(), "Nothing to commit");
            return Ok(false);
        }

        self.run_as_author(&["commit", "-m", message]).await?;
        Ok(true)
    }

    async fn push_force(&self, local: &str, remote: &str) -> Result<(), VcsError> {
        let refspec = if local == remote {
            local.to_string()
        } else {
            format!("{local}:{remote}")
        };
        self.run(&["push", "-f", &self.remote, &refspec]).await.map(drop)
    }

    async fn set_remote_url(&self, url: &str) -> Result<(), VcsError> {
        self.run(&["remote", "set-url", &self.remote, url])
            .await
            .map(drop)
    }

    async fn stash(&self) -> Result<(), VcsError> {
        self.run(&["reset", "--hard", "--quiet"]).await?;
        self.run(&["clean", "-fd", "--quiet"]).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn init_repo() -> (TempDir, GitExecutor) {
        let temp = TempDir::new().unwrap();
        let git = GitExecutor::new(temp.path());
        git.run(&["init", "-b", "main"]).await.unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        assert!(git.commit_all("initial").await.unwrap());
        (temp, git)
    }

    #[tokio::test]
    async fn commit_all_reports_empty_tree() {
        let (_temp, git) = init_repo().await;
        assert!(!git.commit_all("nothing").await.unwrap());
    }

    #[tokio::test]
    async fn stash_reverts_modifications() {
        let (temp, git) = init_repo().await;
        let manifest = temp.path().join("package.json");
        fs::write(&manifest, r#"{ "left-pad": "1.3.0" }"#).unwrap();

        git.stash().await.unwrap();

        assert_eq!(fs::read_to_string(&manifest).unwrap(), "{}");
        assert!(!git.commit_all("after stash").await.unwrap());
    }

    #[tokio::test]
    async fn reverting_leaves_no_stash_entries() {
        let (temp, git) = init_repo().await;
        for version in ["1.3.0", "1.4.0"] {
            fs::write(
                temp.path().join("package.json"),
                format!(r#"{{ "left-pad": "{version}" }}"#),
            )
            .unwrap();
            fs::write(temp.path().join("package-lock.json"), version).unwrap();
            git.stash().await.unwrap();
        }

        assert!(!temp.path().join("package-lock.json").exists());
        let list = git.run(&["stash", "list"]).await.unwrap();
        assert!(String::from_utf8_lossy(&list.stdout).trim().is_empty());
    }

    #[tokio::test]
    async fn branches_can_be_recreated() {
        let (temp, git) = init_repo().await;
        git.create_branch("deps-update").await.unwrap();
        fs::write(temp.path().join("package.json"), "{ }").unwrap();
        assert!(git.commit_all("bump").await.unwrap());

        git.checkout_base("main").await.unwrap();
        git.delete_branch("deps-update").await.unwrap();
        git.create_branch("deps-update").await.unwrap();
    }

    #[tokio::test]
    async fn failing_commands_surface_stderr() {
        let (_temp, git) = init_repo().await;
        let result = git.checkout_base("does-not-exist").await;
        assert!(matches!(result, Err(VcsError::CommandFailed { .. })));
    }
}
