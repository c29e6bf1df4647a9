//! Ecosystem updaters.
//!
//! An updater knows how to rewrite the manifests of one package ecosystem and
//! how to check that a set of bumps still builds. The engine only talks to
//! updaters through [`EcosystemUpdater`]; which updater handles which ecosystem
//! is decided once at start-up via an [`UpdaterRegistry`].

mod error;
mod pattern;

pub use error::UpdaterError;
pub use pattern::PatternUpdater;

use crate::changes::{DependencyChange, Ecosystem};
use crate::validation::ValidationResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Working-tree context handed to updaters.
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    /// Root of the repository working tree.
    pub working_dir: &'a Path,
}

impl<'a> UpdateContext<'a> {
    /// Creates a context rooted at `working_dir`.
    #[must_use]
    pub fn new(working_dir: &'a Path) -> Self {
        Self { working_dir }
    }
}

/// Per-ecosystem capability to apply and validate dependency bumps.
#[async_trait]
pub trait EcosystemUpdater: Send + Sync {
    /// Returns true if this updater can act on `change` in the working tree.
    fn is_applicable(&self, ctx: &UpdateContext<'_>, change: &DependencyChange) -> bool;

    /// Applies `change`, returning how many manifests were modified.
    ///
    /// Zero means the change was not needed (e.g. the version is already current).
    async fn apply(
        &self,
        ctx: &UpdateContext<'_>,
        change: &DependencyChange,
    ) -> Result<usize, UpdaterError>;

    /// Partitions `changes` (all of this updater's ecosystem) into valid and invalid.
    async fn check_dependencies(
        &self,
        ctx: &UpdateContext<'_>,
        changes: &[DependencyChange],
    ) -> Result<ValidationResult, UpdaterError>;
}

/// Maps ecosystem identifiers to their updaters.
#[derive(Clone, Default)]
pub struct UpdaterRegistry {
    updaters: HashMap<Ecosystem, Arc<dyn EcosystemUpdater>>,
}

impl UpdaterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `updater` for `ecosystem`, replacing any previous one.
    pub fn register(&mut self, ecosystem: impl Into<Ecosystem>, updater: Arc<dyn EcosystemUpdater>) {
        self.updaters.insert(ecosystem.into(), updater);
    }

    /// Builder-style variant of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, ecosystem: impl Into<Ecosystem>, updater: Arc<dyn EcosystemUpdater>) -> Self {
        self.register(ecosystem, updater);
        self
    }

    /// Returns the updater for `ecosystem`.
    #[must_use]
    pub fn get(&self, ecosystem: &Ecosystem) -> Option<&dyn EcosystemUpdater> {
        self.updaters.get(ecosystem).map(Arc::as_ref)
    }

    /// Returns true if no updaters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updaters.is_empty()
    }
}

impl fmt::Debug for UpdaterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ecosystems: Vec<_> = self.updaters.keys().map(Ecosystem::as_str).collect();
        ecosystems.sort_unstable();
        f.debug_struct("UpdaterRegistry")
            .field("ecosystems", &ecosystems)
            .finish()
    }
}
