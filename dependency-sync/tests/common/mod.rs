//! In-memory collaborators for driving the reconciler without git or GitHub.
#![allow(dead_code)]

use async_trait::async_trait;
use dependency_sync::{
    encode_pending_changes, CollaborationHost, DependencyChange, EcosystemUpdater, HostError,
    IssueRecord, PullRequestRecord, ReconcileError, ReconcileOutcome, Reconciler,
    RepositoryConfig, Settings, TemplateRenderer, UpdateContext, UpdaterError, UpdaterRegistry,
    ValidationResult, VcsError, VersionControl,
};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

pub const REPOSITORY: &str = "acme/widgets";
pub const BASE: &str = "main";

/// Dependency name to version.
pub type Tree = BTreeMap<String, String>;

pub fn change(text: &str) -> DependencyChange {
    text.parse().unwrap()
}

/// A git repository reduced to branches of dependency versions.
#[derive(Debug)]
pub struct RepoState {
    pub branches: BTreeMap<String, Tree>,
    pub current: String,
    pub working: Tree,
    pub commits: Vec<(String, String, Tree)>,
    pub pushes: Vec<(String, String)>,
    pub created_branches: Vec<String>,
    pub deleted_branches: Vec<String>,
    pub remote_urls: Vec<String>,
    pub stashes: usize,
    pub fail_push: bool,
}

impl RepoState {
    /// True if the working tree matches the checked out branch.
    pub fn is_clean(&self) -> bool {
        self.working == self.branches[&self.current]
    }

    /// Number of calls that change branches, history or the remote.
    pub fn writes(&self) -> usize {
        self.commits.len()
            + self.pushes.len()
            + self.created_branches.len()
            + self.deleted_branches.len()
            + self.remote_urls.len()
    }
}

#[derive(Clone)]
pub struct FakeVcs {
    state: Arc<Mutex<RepoState>>,
}

impl FakeVcs {
    pub fn new(base: Tree) -> Self {
        Self {
            state: Arc::new(Mutex::new(RepoState {
                branches: BTreeMap::from([(BASE.to_string(), base.clone())]),
                current: BASE.to_string(),
                working: base,
                commits: Vec::new(),
                pushes: Vec::new(),
                created_branches: Vec::new(),
                deleted_branches: Vec::new(),
                remote_urls: Vec::new(),
                stashes: 0,
                fail_push: false,
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, RepoState> {
        self.state.lock().unwrap()
    }

    /// Forgets recorded calls, keeping branches and the working tree.
    pub fn clear_log(&self) {
        let mut state = self.state();
        state.commits.clear();
        state.pushes.clear();
        state.created_branches.clear();
        state.deleted_branches.clear();
        state.remote_urls.clear();
        state.stashes = 0;
    }
}

fn failed(command: &str, stderr: &str) -> VcsError {
    VcsError::CommandFailed {
        command: command.to_string(),
        stderr: stderr.to_string(),
    }
}

#[async_trait]
impl VersionControl for FakeVcs {
    async fn checkout_base(&self, base: &str) -> Result<(), VcsError> {
        let mut state = self.state();
        let tree = state
            .branches
            .get(base)
            .cloned()
            .ok_or_else(|| failed("git checkout", "unknown branch"))?;
        state.current = base.to_string();
        state.working = tree;
        Ok(())
    }

    async fn create_branch(&self, name: &str) -> Result<(), VcsError> {
        let mut state = self.state();
        if state.branches.contains_key(name) {
            return Err(failed("git checkout -b", "branch already exists"));
        }
        let head = state.branches[&state.current].clone();
        state.branches.insert(name.to_string(), head);
        state.current = name.to_string();
        state.created_branches.push(name.to_string());
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> Result<(), VcsError> {
        let mut state = self.state();
        if state.current == name || state.branches.remove(name).is_none() {
            return Err(failed("git branch -D", "cannot delete branch"));
        }
        state.deleted_branches.push(name.to_string());
        Ok(())
    }

    async fn commit_all(&self, message: &str) -> Result<bool, VcsError> {
        let mut state = self.state();
        let current = state.current.clone();
        if state.branches[&current] == state.working {
            return Ok(false);
        }
        let tree = state.working.clone();
        state.branches.insert(current.clone(), tree.clone());
        state.commits.push((current, message.to_string(), tree));
        Ok(true)
    }

    async fn push_force(&self, local: &str, remote: &str) -> Result<(), VcsError> {
        let mut state = self.state();
        if state.fail_push {
            return Err(failed("git push", "permission denied"));
        }
        state.pushes.push((local.to_string(), remote.to_string()));
        Ok(())
    }

    async fn set_remote_url(&self, url: &str) -> Result<(), VcsError> {
        self.state().remote_urls.push(url.to_string());
        Ok(())
    }

    async fn stash(&self) -> Result<(), VcsError> {
        let mut state = self.state();
        let head = state.branches[&state.current].clone();
        state.working = head;
        state.stashes += 1;
        Ok(())
    }
}

/// Rewrites versions in the shared working tree; rejects configured changes.
pub struct FakeUpdater {
    repo: Arc<Mutex<RepoState>>,
    rejected: Mutex<HashSet<DependencyChange>>,
}

impl FakeUpdater {
    pub fn new(vcs: &FakeVcs) -> Arc<Self> {
        Arc::new(Self {
            repo: vcs.state.clone(),
            rejected: Mutex::new(HashSet::new()),
        })
    }

    pub fn reject(&self, change: DependencyChange) {
        self.rejected.lock().unwrap().insert(change);
    }

    pub fn accept(&self, change: &DependencyChange) {
        self.rejected.lock().unwrap().remove(change);
    }
}

#[async_trait]
impl EcosystemUpdater for FakeUpdater {
    fn is_applicable(&self, _ctx: &UpdateContext<'_>, _change: &DependencyChange) -> bool {
        true
    }

    async fn apply(
        &self,
        _ctx: &UpdateContext<'_>,
        change: &DependencyChange,
    ) -> Result<usize, UpdaterError> {
        let mut repo = self.repo.lock().unwrap();
        match repo.working.get_mut(&change.dependency) {
            Some(version) if *version != change.version => {
                version.clone_from(&change.version);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn check_dependencies(
        &self,
        _ctx: &UpdateContext<'_>,
        changes: &[DependencyChange],
    ) -> Result<ValidationResult, UpdaterError> {
        let rejected = self.rejected.lock().unwrap();
        let (invalid, valid): (Vec<_>, Vec<_>) = changes
            .iter()
            .cloned()
            .partition(|change| rejected.contains(change));
        Ok(ValidationResult { valid, invalid })
    }
}

#[derive(Debug, Clone)]
pub struct FakePullRequest {
    pub record: PullRequestRecord,
    pub base: String,
    pub body: String,
    pub mergeable: bool,
    pub labels: Vec<String>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FakeIssue {
    pub record: IssueRecord,
    pub labels: Vec<String>,
    pub comments: Vec<String>,
    pub open: bool,
}

/// Host write calls in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostWrite {
    CreatePullRequest { title: String, head: String },
    CommentPullRequest { number: u64 },
    SetTitle { number: u64, title: String },
    SetLabels { number: u64 },
    CreateIssue { title: String },
    CommentIssue { number: u64 },
    CloseIssue { number: u64 },
}

#[derive(Debug, Default)]
pub struct HostState {
    pub pull_requests: Vec<FakePullRequest>,
    pub issues: Vec<FakeIssue>,
    pub writes: Vec<HostWrite>,
    pub fail_pull_request_listing: bool,
    next_number: u64,
}

impl HostState {
    fn next_number(&mut self) -> u64 {
        self.next_number += 1;
        self.next_number
    }

    pub fn open_issues(&self) -> Vec<&FakeIssue> {
        self.issues.iter().filter(|issue| issue.open).collect()
    }
}

#[derive(Default)]
pub struct FakeHost {
    state: Mutex<HostState>,
}

impl FakeHost {
    pub fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap()
    }

    /// Seeds an open pull request and returns its number.
    pub fn seed_pull_request(&self, title: &str, head_ref: &str, mergeable: bool) -> u64 {
        let mut state = self.state();
        let number = state.next_number();
        state.pull_requests.push(FakePullRequest {
            record: PullRequestRecord {
                number,
                title: title.to_string(),
                head_ref: head_ref.to_string(),
                html_url: format!("https://github.com/{REPOSITORY}/pull/{number}"),
            },
            base: BASE.to_string(),
            body: String::new(),
            mergeable,
            labels: Vec::new(),
            comments: Vec::new(),
        });
        number
    }

    /// Seeds an open pending updates issue recording `changes`.
    pub fn seed_pending_issue(&self, settings: &Settings, changes: &[DependencyChange]) -> u64 {
        let mut state = self.state();
        let number = state.next_number();
        state.issues.push(FakeIssue {
            record: IssueRecord {
                number,
                title: settings.pending.issue_title.clone(),
                body: "Dependency updates that failed validation.".to_string(),
                html_url: format!("https://github.com/{REPOSITORY}/issues/{number}"),
            },
            labels: settings.pending.labels.clone(),
            comments: vec![encode_pending_changes(changes)],
            open: true,
        });
        number
    }

    pub fn writes(&self) -> Vec<HostWrite> {
        self.state().writes.clone()
    }

    pub fn clear_log(&self) {
        self.state().writes.clear();
    }
}

fn not_found(number: u64) -> HostError {
    HostError::RequestFailed {
        message: format!("#{number} not found"),
    }
}

#[async_trait]
impl CollaborationHost for FakeHost {
    fn repository(&self) -> &str {
        REPOSITORY
    }

    fn ssh_url(&self) -> String {
        format!("git@github.com:{REPOSITORY}.git")
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestRecord>, HostError> {
        let state = self.state();
        if state.fail_pull_request_listing {
            return Err(HostError::RequestFailed {
                message: "service unavailable".to_string(),
            });
        }
        Ok(state
            .pull_requests
            .iter()
            .map(|pr| pr.record.clone())
            .collect())
    }

    async fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequestRecord, HostError> {
        let mut state = self.state();
        let number = state.next_number();
        let record = PullRequestRecord {
            number,
            title: title.to_string(),
            head_ref: head.to_string(),
            html_url: format!("https://github.com/{REPOSITORY}/pull/{number}"),
        };
        state.pull_requests.push(FakePullRequest {
            record: record.clone(),
            base: base.to_string(),
            body: body.to_string(),
            mergeable: true,
            labels: Vec::new(),
            comments: Vec::new(),
        });
        state.writes.push(HostWrite::CreatePullRequest {
            title: title.to_string(),
            head: head.to_string(),
        });
        Ok(record)
    }

    async fn comment_on_pull_request(&self, number: u64, text: &str) -> Result<(), HostError> {
        let mut state = self.state();
        let pr = state
            .pull_requests
            .iter_mut()
            .find(|pr| pr.record.number == number)
            .ok_or_else(|| not_found(number))?;
        pr.comments.push(text.to_string());
        state.writes.push(HostWrite::CommentPullRequest { number });
        Ok(())
    }

    async fn set_pull_request_title(&self, number: u64, title: &str) -> Result<(), HostError> {
        let mut state = self.state();
        let pr = state
            .pull_requests
            .iter_mut()
            .find(|pr| pr.record.number == number)
            .ok_or_else(|| not_found(number))?;
        pr.record.title = title.to_string();
        state.writes.push(HostWrite::SetTitle {
            number,
            title: title.to_string(),
        });
        Ok(())
    }

    async fn set_labels(&self, number: u64, labels: &[String]) -> Result<(), HostError> {
        let mut state = self.state();
        let pr = state
            .pull_requests
            .iter_mut()
            .find(|pr| pr.record.number == number)
            .ok_or_else(|| not_found(number))?;
        pr.labels = labels.to_vec();
        state.writes.push(HostWrite::SetLabels { number });
        Ok(())
    }

    async fn is_mergeable(&self, number: u64) -> Result<bool, HostError> {
        self.state()
            .pull_requests
            .iter()
            .find(|pr| pr.record.number == number)
            .map(|pr| pr.mergeable)
            .ok_or_else(|| not_found(number))
    }

    async fn list_open_issues(&self, labels: &[String]) -> Result<Vec<IssueRecord>, HostError> {
        Ok(self
            .state()
            .issues
            .iter()
            .filter(|issue| issue.open && labels.iter().all(|l| issue.labels.contains(l)))
            .map(|issue| issue.record.clone())
            .collect())
    }

    async fn issue_comments(&self, number: u64) -> Result<Vec<String>, HostError> {
        self.state()
            .issues
            .iter()
            .find(|issue| issue.record.number == number)
            .map(|issue| issue.comments.clone())
            .ok_or_else(|| not_found(number))
    }

    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<IssueRecord, HostError> {
        let mut state = self.state();
        let number = state.next_number();
        let record = IssueRecord {
            number,
            title: title.to_string(),
            body: body.to_string(),
            html_url: format!("https://github.com/{REPOSITORY}/issues/{number}"),
        };
        state.issues.push(FakeIssue {
            record: record.clone(),
            labels: labels.to_vec(),
            comments: Vec::new(),
            open: true,
        });
        state.writes.push(HostWrite::CreateIssue {
            title: title.to_string(),
        });
        Ok(record)
    }

    async fn comment_on_issue(&self, number: u64, text: &str) -> Result<(), HostError> {
        let mut state = self.state();
        let issue = state
            .issues
            .iter_mut()
            .find(|issue| issue.record.number == number)
            .ok_or_else(|| not_found(number))?;
        issue.comments.push(text.to_string());
        state.writes.push(HostWrite::CommentIssue { number });
        Ok(())
    }

    async fn close_issue(&self, number: u64) -> Result<(), HostError> {
        let mut state = self.state();
        let issue = state
            .issues
            .iter_mut()
            .find(|issue| issue.record.number == number)
            .ok_or_else(|| not_found(number))?;
        issue.open = false;
        state.writes.push(HostWrite::CloseIssue { number });
        Ok(())
    }
}

/// One repository wired to in-memory collaborators.
pub struct World {
    pub vcs: FakeVcs,
    pub updater: Arc<FakeUpdater>,
    pub host: FakeHost,
    pub settings: Settings,
    pub repository: RepositoryConfig,
    pub renderer: TemplateRenderer,
    pub registry: UpdaterRegistry,
}

impl World {
    /// Creates a repository whose base branch holds `dependencies` (`name`, `version`).
    pub fn new(dependencies: &[(&str, &str)]) -> Self {
        let base = dependencies
            .iter()
            .map(|(name, version)| (name.to_string(), version.to_string()))
            .collect();
        let vcs = FakeVcs::new(base);
        let updater = FakeUpdater::new(&vcs);
        let registry = UpdaterRegistry::new()
            .with("npm", updater.clone())
            .with("mvn", updater.clone());

        Self {
            vcs,
            updater,
            host: FakeHost::default(),
            settings: Settings::default(),
            repository: RepositoryConfig {
                path: PathBuf::from("."),
                github: Some(REPOSITORY.to_string()),
                base_branch: BASE.to_string(),
                topic: "dependencies".to_string(),
            },
            renderer: TemplateRenderer::new(),
            registry,
        }
    }

    /// Reconciles against the fake host.
    pub async fn run(
        &self,
        proposed: &[DependencyChange],
    ) -> Result<ReconcileOutcome, ReconcileError> {
        Reconciler::new(
            &self.registry,
            &self.vcs,
            &self.settings,
            &self.repository,
            &self.renderer,
        )
        .with_host(&self.host)
        .reconcile(proposed)
        .await
    }

    /// Reconciles as a plain git repository.
    pub async fn run_without_host(
        &self,
        proposed: &[DependencyChange],
    ) -> Result<ReconcileOutcome, ReconcileError> {
        Reconciler::new(
            &self.registry,
            &self.vcs,
            &self.settings,
            &self.repository,
            &self.renderer,
        )
        .reconcile(proposed)
        .await
    }

    /// Reconciles without publishing.
    pub async fn dry_run(
        &self,
        proposed: &[DependencyChange],
    ) -> Result<ReconcileOutcome, ReconcileError> {
        Reconciler::new(
            &self.registry,
            &self.vcs,
            &self.settings,
            &self.repository,
            &self.renderer,
        )
        .with_host(&self.host)
        .dry_run(true)
        .reconcile(proposed)
        .await
    }
}
