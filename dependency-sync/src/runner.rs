//! Orchestrates reconciliation of every configured repository.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::changes::{combine_pending, describe_changes, ChangeFile, DependencyChange};
use crate::config::{RepositoryConfig, Settings};
use crate::host::GitHubHost;
use crate::reconcile::Reconciler;
use crate::summary::{ProcessingResult, RunSummary};
use crate::templates::TemplateRenderer;
use crate::updaters::{PatternUpdater, UpdaterRegistry};
use crate::vcs::GitExecutor;
use futures::stream::{self, StreamExt};
use octocrab::Octocrab;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Orchestrates a full reconciliation run.
pub struct Runner {
    config: RunnerConfig,
    octocrab: Octocrab,
    renderer: TemplateRenderer,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Octocrab`] if the GitHub client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let mut builder = Octocrab::builder();
        if let Some(token) = config.token() {
            builder = builder.personal_token(token.to_string());
        }
        let octocrab = builder.build()?;
        Ok(Self {
            config,
            octocrab,
            renderer: TemplateRenderer::new(),
        })
    }

    /// Executes the full orchestration flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the settings or change file cannot be loaded.
    /// Failures of individual repositories are recorded in the summary.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        let settings = Settings::load(self.config.settings_path())?;
        let changes = self.proposed_changes()?;

        if settings.repositories.is_empty() {
            warn!("No repositories configured");
            return Ok(summary);
        }

        let registry = build_registry(&settings);
        info!(
            repositories = settings.repositories.len(),
            ecosystems = settings.ecosystems.len(),
            proposed = %describe_changes(&changes),
            "Reconciling repositories"
        );

        let results: Vec<ProcessingResult> = stream::iter(&settings.repositories)
            .map(|repository| {
                process_repository(
                    &self.octocrab,
                    &registry,
                    &settings,
                    repository,
                    &self.renderer,
                    &changes,
                    self.config.dry_run(),
                )
            })
            .buffer_unordered(self.config.concurrency())
            .collect()
            .await;

        for result in &results {
            summary.record_result(result);
        }

        Ok(summary)
    }

    /// Gathers changes from the change file and the command line.
    fn proposed_changes(&self) -> Result<Vec<DependencyChange>, RunnerError> {
        let from_file = match self.config.changes_path() {
            Some(path) => ChangeFile::load(path)?.changes,
            None => Vec::new(),
        };
        Ok(combine_pending(&from_file, self.config.changes()))
    }
}

/// Registers a [`PatternUpdater`] for every configured ecosystem.
fn build_registry(settings: &Settings) -> UpdaterRegistry {
    settings
        .ecosystems
        .iter()
        .fold(UpdaterRegistry::new(), |registry, ecosystem| {
            registry.with(
                ecosystem.id.as_str(),
                Arc::new(PatternUpdater::from_config(ecosystem)),
            )
        })
}

async fn process_repository(
    octocrab: &Octocrab,
    registry: &UpdaterRegistry,
    settings: &Settings,
    repository: &RepositoryConfig,
    renderer: &TemplateRenderer,
    changes: &[DependencyChange],
    dry_run: bool,
) -> ProcessingResult {
    let name = repository.display_name();
    info!(repo = %name, path = %repository.path.display(), "Processing repository");

    let vcs = GitExecutor::new(&repository.path);
    let host = repository
        .github_repo()
        .map(|(owner, repo)| GitHubHost::new(octocrab.clone(), owner, repo));

    let mut reconciler =
        Reconciler::new(registry, &vcs, settings, repository, renderer).dry_run(dry_run);
    if let Some(host) = &host {
        reconciler = reconciler.with_host(host);
    }

    match reconciler.reconcile(changes).await {
        Ok(outcome) => ProcessingResult::Success {
            repository: name,
            outcome,
        },
        Err(e) => {
            error!(repo = %name, error = %e, "Reconciliation aborted");
            ProcessingResult::Failed {
                repository: name,
                error: e.to_string(),
            }
        }
    }
}
