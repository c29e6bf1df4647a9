//! Version control of the working tree.
//!
//! The reconciler only needs a handful of operations on the working tree; they
//! are expressed by [`VersionControl`] so tests can substitute an in-memory
//! implementation for [`GitExecutor`].

mod error;
mod git;

pub use error::VcsError;
pub use git::{GitExecutor, DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME};

use async_trait::async_trait;
use bstr::ByteSlice;

/// Operations on a single version-controlled working tree.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Checks out the base branch.
    async fn checkout_base(&self, base: &str) -> Result<(), VcsError>;

    /// Creates `name` from the current HEAD and checks it out.
    async fn create_branch(&self, name: &str) -> Result<(), VcsError>;

    /// Deletes the local branch `name`.
    async fn delete_branch(&self, name: &str) -> Result<(), VcsError>;

    /// Stages and commits everything. Returns false if there was nothing to commit.
    async fn commit_all(&self, message: &str) -> Result<bool, VcsError>;

    /// Force pushes `local` to `remote` on the configured remote.
    async fn push_force(&self, local: &str, remote: &str) -> Result<(), VcsError>;

    /// Sets the fetch/push URL of the configured remote.
    async fn set_remote_url(&self, url: &str) -> Result<(), VcsError>;

    /// Discards all uncommitted modifications, including untracked files.
    async fn stash(&self) -> Result<(), VcsError>;
}

/// Checks that `name` can be used as a branch name.
///
/// # Errors
///
/// Returns [`VcsError::InvalidBranch`] if git would reject the name.
pub fn validate_branch_name(name: &str) -> Result<(), VcsError> {
    gix_validate::reference::name_partial(name.as_bytes().as_bstr())
        .map(drop)
        .map_err(|e| VcsError::InvalidBranch {
            name: name.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_branch_names() {
        assert!(validate_branch_name("dependency-sync-3f2a").is_ok());
        assert!(validate_branch_name("deps/npm-left-pad").is_ok());
    }

    #[test]
    fn rejects_malformed_branch_names() {
        for name in ["", "bad..name", "ends-with.lock", "has space", "trailing/"] {
            assert!(
                matches!(validate_branch_name(name), Err(VcsError::InvalidBranch { .. })),
                "{name:?} should be rejected"
            );
        }
    }
}
