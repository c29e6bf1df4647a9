//! Applying change-sets to the working tree.

mod error;

pub use error::ApplyError;

use crate::changes::DependencyChange;
use crate::updaters::{UpdateContext, UpdaterRegistry};
use tracing::debug;

/// Changes that actually modified the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedChanges {
    changes: Vec<DependencyChange>,
    files_modified: usize,
}

impl AppliedChanges {
    /// Changes that modified at least one manifest, in application order.
    #[must_use]
    pub fn changes(&self) -> &[DependencyChange] {
        &self.changes
    }

    /// Total number of manifest modifications.
    #[must_use]
    pub fn files_modified(&self) -> usize {
        self.files_modified
    }

    /// Returns true if nothing was modified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Consumes self, returning the applied changes.
    #[must_use]
    pub fn into_changes(self) -> Vec<DependencyChange> {
        self.changes
    }
}

/// Applies `changes` to the working tree through their updaters.
///
/// Inapplicable changes and changes that turned out to be no-ops are left out
/// of the result, so an empty result means there is nothing to commit.
///
/// # Errors
///
/// Returns [`ApplyError`] if an ecosystem has no updater or an updater fails.
pub async fn apply_changes(
    registry: &UpdaterRegistry,
    ctx: &UpdateContext<'_>,
    changes: &[DependencyChange],
) -> Result<AppliedChanges, ApplyError> {
    let mut applied = AppliedChanges::default();

    for change in changes {
        let updater = registry
            .get(&change.ecosystem)
            .ok_or_else(|| ApplyError::UpdaterNotFound {
                ecosystem: change.ecosystem.to_string(),
                change: change.to_string(),
            })?;

        if !updater.is_applicable(ctx, change) {
            debug!(%change, "Updater not applicable, skipping");
            continue;
        }

        let modified = updater
            .apply(ctx, change)
            .await
            .map_err(|source| ApplyError::Updater {
                change: change.to_string(),
                source,
            })?;

        if modified == 0 {
            debug!(%change, "Already up to date");
            continue;
        }

        applied.files_modified += modified;
        applied.changes.push(change.clone());
    }

    Ok(applied)
}
