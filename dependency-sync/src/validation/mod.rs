//! Validation of applied change-sets.
//!
//! Changes are grouped per ecosystem and each group is handed to the matching
//! updater's dependency check. The per-ecosystem answers are merged into a
//! single [`ValidationResult`].

mod error;

pub use error::ValidationError;

use crate::changes::{describe_changes, DependencyChange, Ecosystem};
use crate::updaters::{UpdateContext, UpdaterRegistry};
use tracing::{debug, warn};

/// Partition of a change-set into valid and invalid changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Changes that passed their ecosystem's check.
    pub valid: Vec<DependencyChange>,

    /// Changes that failed and must be deferred.
    pub invalid: Vec<DependencyChange>,
}

impl ValidationResult {
    /// Returns true if any change failed validation.
    #[must_use]
    pub fn has_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }
}

/// Groups changes by ecosystem, keeping first-seen ecosystem order and
/// per-group order.
#[must_use]
pub fn group_by_ecosystem(changes: &[DependencyChange]) -> Vec<(Ecosystem, Vec<DependencyChange>)> {
    let mut groups: Vec<(Ecosystem, Vec<DependencyChange>)> = Vec::new();
    for change in changes {
        match groups.iter_mut().find(|(e, _)| *e == change.ecosystem) {
            Some((_, group)) => group.push(change.clone()),
            None => groups.push((change.ecosystem.clone(), vec![change.clone()])),
        }
    }
    groups
}

/// Validates `changes` with the registered updaters.
///
/// Every input change ends up in exactly one partition. A change the updater
/// left unclassified, or reported as both valid and invalid, counts as invalid.
///
/// # Errors
///
/// Returns [`ValidationError::UpdaterNotFound`] if an ecosystem has no updater,
/// or [`ValidationError::Updater`] if a check itself fails.
pub async fn validate_changes(
    registry: &UpdaterRegistry,
    ctx: &UpdateContext<'_>,
    changes: &[DependencyChange],
) -> Result<ValidationResult, ValidationError> {
    let mut result = ValidationResult::default();

    for (ecosystem, group) in group_by_ecosystem(changes) {
        let updater = registry
            .get(&ecosystem)
            .ok_or_else(|| ValidationError::UpdaterNotFound {
                ecosystem: ecosystem.to_string(),
                changes: describe_changes(&group),
            })?;

        debug!(%ecosystem, count = group.len(), "Checking dependencies");
        let checked = updater
            .check_dependencies(ctx, &group)
            .await
            .map_err(|source| ValidationError::Updater {
                ecosystem: ecosystem.to_string(),
                source,
            })?;

        for change in group {
            let valid = checked.valid.contains(&change);
            let invalid = checked.invalid.contains(&change);
            if valid && !invalid {
                result.valid.push(change);
            } else {
                if !invalid {
                    warn!(%change, "Updater did not classify change, treating as invalid");
                }
                result.invalid.push(change);
            }
        }
    }

    Ok(result)
}
