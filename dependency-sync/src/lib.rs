#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod apply;
pub mod changes;
pub mod config;
pub mod host;
pub mod pending;
pub mod pull_requests;
pub mod rate_limit;
pub mod reconcile;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod updaters;
pub mod validation;
pub mod vcs;

pub use apply::{apply_changes, AppliedChanges, ApplyError};
pub use changes::{
    combine_pending, describe_changes, ChangeError, ChangeFile, DependencyChange, Ecosystem,
};
pub use config::{
    ConfigError, EcosystemConfig, PendingSettings, PullRequestSettings, RepositoryConfig, Settings,
};
pub use host::{CollaborationHost, GitHubHost, HostError, IssueRecord, PullRequestRecord};
pub use pending::{
    decode_pending_changes, encode_pending_changes, PendingChangeStore, PendingChanges,
    PendingError, PendingStatus,
};
pub use pull_requests::{
    find_pull_request, PrError, PrStatus, PullRequestContent, PullRequestState,
    PullRequestSynchronizer,
};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use reconcile::{ReconcileError, ReconcileOutcome, Reconciler};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{ProcessingResult, RunSummary};
pub use templates::{
    create_handlebars_registry, generate_branch_name, generate_pr_title, generate_title_prefix,
    TemplateError, TemplateRenderer,
};
pub use updaters::{EcosystemUpdater, PatternUpdater, UpdateContext, UpdaterError, UpdaterRegistry};
pub use validation::{validate_changes, ValidationError, ValidationResult};
pub use vcs::{GitExecutor, VcsError, VersionControl};
