//! CLI for dependency-sync.
//!
//! Applies proposed dependency version bumps to the configured repositories
//! and keeps one pull request per repository in line with them.

use clap::Parser;
use dependency_sync::{DependencyChange, RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// dependency-sync - Propagate dependency version bumps into pull requests.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file.
    #[arg(long, default_value = "dependency-sync.toml")]
    config: PathBuf,

    /// TOML file of proposed changes.
    #[arg(long)]
    changes: Option<PathBuf>,

    /// Proposed change as `ecosystem:dependency:version`; repeatable.
    #[arg(long = "change", value_name = "ECOSYSTEM:DEPENDENCY:VERSION")]
    change: Vec<DependencyChange>,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Apply and validate, then revert without publishing.
    #[arg(long)]
    dry_run: bool,

    /// Maximum repositories reconciled at once.
    #[arg(long, default_value_t = 5)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with `RUST_LOG` filtering, defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut config = RunnerConfig::new(args.config, args.token, args.dry_run, args.concurrency)
        .with_changes(args.change);
    if let Some(path) = args.changes {
        config = config.with_changes_path(path);
    }
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Repositories processed: {}", summary.repositories_processed);
    println!("  No changes: {}", summary.no_changes);
    println!("  Applied: {}", summary.applied);
    println!("  All changes deferred: {}", summary.deferred_only);
    println!("  Failed: {}", summary.failed);

    if !summary.dry_run {
        println!("  PRs created: {}", summary.prs_created);
        println!("  PRs updated: {}", summary.prs_updated);
        println!("  PRs unchanged: {}", summary.prs_unchanged);
        println!("  Pushes failed: {}", summary.prs_push_failed);
        println!("  Local commits: {}", summary.local_commits);
        println!("  Pending issues created: {}", summary.pending_created);
        println!("  Pending issues updated: {}", summary.pending_updated);
        println!("  Pending issues closed: {}", summary.pending_closed);
    }
}
