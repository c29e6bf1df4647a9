//! Proposed dependency changes.
//!
//! A change-set is a plain `Vec<DependencyChange>`; the helpers here keep the
//! set semantics (ecosystem + dependency + version) used when merging
//! explicitly proposed changes with changes deferred by earlier runs.

mod change;
mod error;
mod file;

pub use change::{DependencyChange, Ecosystem};
pub use error::ChangeError;
pub use file::ChangeFile;

/// Returns true if `changes` already contains `change`.
#[must_use]
pub fn has_dependency(changes: &[DependencyChange], change: &DependencyChange) -> bool {
    changes.contains(change)
}

/// Merges previously deferred changes into the proposed change-set.
///
/// Proposed changes keep their order; pending changes not already present are
/// appended after them. Duplicates are dropped.
#[must_use]
pub fn combine_pending(
    proposed: &[DependencyChange],
    pending: &[DependencyChange],
) -> Vec<DependencyChange> {
    let mut combined: Vec<DependencyChange> = Vec::with_capacity(proposed.len() + pending.len());
    for change in proposed.iter().chain(pending) {
        if !has_dependency(&combined, change) {
            combined.push(change.clone());
        }
    }
    combined
}

/// Returns the distinct ecosystems of `changes` in first-seen order.
#[must_use]
pub fn ecosystems_of(changes: &[DependencyChange]) -> Vec<Ecosystem> {
    let mut ecosystems: Vec<Ecosystem> = Vec::new();
    for change in changes {
        if !ecosystems.contains(&change.ecosystem) {
            ecosystems.push(change.ecosystem.clone());
        }
    }
    ecosystems
}

/// Describes changes for titles and log lines, e.g. `left-pad 1.3.0, foo 2.0.0`.
#[must_use]
pub fn describe_changes(changes: &[DependencyChange]) -> String {
    changes
        .iter()
        .map(|c| format!("{} {}", c.dependency, c.version))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns true if both slices hold the same changes, ignoring order and duplicates.
#[must_use]
pub fn same_changes(a: &[DependencyChange], b: &[DependencyChange]) -> bool {
    use std::collections::BTreeSet;
    a.iter().collect::<BTreeSet<_>>() == b.iter().collect::<BTreeSet<_>>()
}
