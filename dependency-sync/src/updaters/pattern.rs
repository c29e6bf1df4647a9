//! Regex driven manifest updater.

use super::{EcosystemUpdater, UpdateContext, UpdaterError};
use crate::changes::{DependencyChange, Ecosystem};
use crate::config::EcosystemConfig;
use crate::templates::create_handlebars_registry;
use crate::validation::ValidationResult;
use async_trait::async_trait;
use handlebars::Handlebars;
use regex::Regex;
use serde_json::json;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Name of the capture group holding the version in manifest patterns.
const VERSION_GROUP: &str = "version";

/// Updater that rewrites versions in manifests with a configurable pattern.
///
/// The pattern is a handlebars template rendered per change, where
/// `{{dependency}}` expands to the regex-escaped dependency name. The
/// rendered regex must contain a `(?P<version>...)` group; every match whose
/// version differs from the target is rewritten.
///
/// Validation runs the optional check command once per change inside the
/// working tree. Its arguments are templates over `ecosystem`, `dependency`
/// and `version`; exit status zero marks the change as valid.
pub struct PatternUpdater {
    ecosystem: Ecosystem,
    files: Vec<PathBuf>,
    pattern: String,
    check_command: Vec<String>,
    handlebars: Handlebars<'static>,
}

impl PatternUpdater {
    /// Creates an updater for `ecosystem`.
    pub fn new(
        ecosystem: impl Into<Ecosystem>,
        files: Vec<PathBuf>,
        pattern: impl Into<String>,
        check_command: Vec<String>,
    ) -> Self {
        Self {
            ecosystem: ecosystem.into(),
            files,
            pattern: pattern.into(),
            check_command,
            handlebars: create_handlebars_registry(),
        }
    }

    /// Creates an updater from an `[[ecosystem]]` config entry.
    #[must_use]
    pub fn from_config(config: &EcosystemConfig) -> Self {
        Self::new(
            config.id.as_str(),
            config.files.clone(),
            config.pattern.clone(),
            config.check_command.clone(),
        )
    }

    /// Renders and compiles the manifest regex for `change`.
    fn regex_for(&self, change: &DependencyChange) -> Result<Regex, UpdaterError> {
        let invalid = |message: String| UpdaterError::InvalidPattern {
            ecosystem: self.ecosystem.to_string(),
            message,
        };

        let data = json!({
            "ecosystem": change.ecosystem.as_str(),
            "dependency": regex::escape(&change.dependency),
        });
        let rendered = self
            .handlebars
            .render_template(&self.pattern, &data)
            .map_err(|e| invalid(e.to_string()))?;
        let regex = Regex::new(&rendered).map_err(|e| invalid(e.to_string()))?;

        if !regex.capture_names().flatten().any(|n| n == VERSION_GROUP) {
            return Err(invalid(format!("pattern has no '{VERSION_GROUP}' group")));
        }
        Ok(regex)
    }

    /// Renders the check command arguments for `change`.
    fn check_args(&self, change: &DependencyChange) -> Result<Vec<String>, UpdaterError> {
        let data = json!({
            "ecosystem": change.ecosystem.as_str(),
            "dependency": change.dependency,
            "version": change.version,
        });
        self.check_command
            .iter()
            .map(|arg| {
                self.handlebars
                    .render_template(arg, &data)
                    .map_err(|e| UpdaterError::CheckFailed {
                        command: self.check_command.join(" "),
                        message: e.to_string(),
                    })
            })
            .collect()
    }

    /// Runs the check command for `change`, returning whether it passed.
    async fn run_check(
        &self,
        ctx: &UpdateContext<'_>,
        change: &DependencyChange,
    ) -> Result<bool, UpdaterError> {
        let args = self.check_args(change)?;
        let Some((program, rest)) = args.split_first() else {
            return Ok(true);
        };

        debug!(command = %args.join(" "), %change, "Running dependency check");
        let output = Command::new(program)
            .args(rest)
            .current_dir(ctx.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| UpdaterError::CheckFailed {
                command: args.join(" "),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(%change, stderr = %stderr.trim(), "Dependency check failed");
        }
        Ok(output.status.success())
    }
}

/// Replaces every differing `version` capture with `version`.
///
/// Returns `None` when nothing needed to change.
fn rewrite_versions(content: &str, regex: &Regex, version: &str) -> Option<String> {
    let mut output = String::with_capacity(content.len());
    let mut last = 0;
    let mut changed = false;

    for captures in regex.captures_iter(content) {
        let Some(found) = captures.name(VERSION_GROUP) else {
            continue;
        };
        if found.as_str() == version {
            continue;
        }
        output.push_str(&content[last..found.start()]);
        output.push_str(version);
        last = found.end();
        changed = true;
    }

    if !changed {
        return None;
    }
    output.push_str(&content[last..]);
    Some(output)
}

#[async_trait]
impl EcosystemUpdater for PatternUpdater {
    fn is_applicable(&self, ctx: &UpdateContext<'_>, _change: &DependencyChange) -> bool {
        self.files.iter().any(|f| ctx.working_dir.join(f).is_file())
    }

    async fn apply(
        &self,
        ctx: &UpdateContext<'_>,
        change: &DependencyChange,
    ) -> Result<usize, UpdaterError> {
        let regex = self.regex_for(change)?;
        let mut modified = 0;

        for file in &self.files {
            let path = ctx.working_dir.join(file);
            if !path.is_file() {
                continue;
            }

            let content = std::fs::read_to_string(&path).map_err(|e| UpdaterError::IoError {
                path: path.display().to_string(),
                source: e,
            })?;

            if let Some(updated) = rewrite_versions(&content, &regex, &change.version) {
                std::fs::write(&path, updated).map_err(|e| UpdaterError::IoError {
                    path: path.display().to_string(),
                    source: e,
                })?;
                info!(file = %file.display(), %change, "Updated manifest");
                modified += 1;
            }
        }

        Ok(modified)
    }

    async fn check_dependencies(
        &self,
        ctx: &UpdateContext<'_>,
        changes: &[DependencyChange],
    ) -> Result<ValidationResult, UpdaterError> {
        let mut result = ValidationResult::default();
        for change in changes {
            if self.run_check(ctx, change).await? {
                result.valid.push(change.clone());
            } else {
                result.invalid.push(change.clone());
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const NPM_PATTERN: &str = r#""{{dependency}}"\s*:\s*"(?P<version>[^"]+)""#;

    fn npm_updater(check_command: Vec<String>) -> PatternUpdater {
        PatternUpdater::new(
            "npm",
            vec![PathBuf::from("package.json")],
            NPM_PATTERN,
            check_command,
        )
    }

    fn write_manifest(dir: &TempDir) {
        fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "left-pad": "1.1.0", "right-pad": "1.1.0" } }"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn rewrites_only_the_named_dependency() {
        let temp = TempDir::new().unwrap();
        write_manifest(&temp);
        let updater = npm_updater(Vec::new());
        let ctx = UpdateContext::new(temp.path());

        let change = DependencyChange::new("npm", "left-pad", "1.3.0");
        assert!(updater.is_applicable(&ctx, &change));
        assert_eq!(updater.apply(&ctx, &change).await.unwrap(), 1);

        let content = fs::read_to_string(temp.path().join("package.json")).unwrap();
        assert!(content.contains(r#""left-pad": "1.3.0""#));
        assert!(content.contains(r#""right-pad": "1.1.0""#));
    }

    #[tokio::test]
    async fn current_version_is_not_a_modification() {
        let temp = TempDir::new().unwrap();
        write_manifest(&temp);
        let updater = npm_updater(Vec::new());
        let ctx = UpdateContext::new(temp.path());

        let change = DependencyChange::new("npm", "left-pad", "1.1.0");
        assert_eq!(updater.apply(&ctx, &change).await.unwrap(), 0);
    }

    #[test]
    fn not_applicable_without_manifest() {
        let temp = TempDir::new().unwrap();
        let updater = npm_updater(Vec::new());
        let change = DependencyChange::new("npm", "left-pad", "1.3.0");
        assert!(!updater.is_applicable(&UpdateContext::new(temp.path()), &change));
    }

    #[tokio::test]
    async fn pattern_without_version_group_is_rejected() {
        let temp = TempDir::new().unwrap();
        write_manifest(&temp);
        let updater = PatternUpdater::new(
            "npm",
            vec![PathBuf::from("package.json")],
            r#""{{dependency}}""#,
            Vec::new(),
        );

        let change = DependencyChange::new("npm", "left-pad", "1.3.0");
        let result = updater.apply(&UpdateContext::new(temp.path()), &change).await;
        assert!(matches!(result, Err(UpdaterError::InvalidPattern { .. })));
    }

    #[test]
    fn dependency_names_are_escaped() {
        let updater = npm_updater(Vec::new());
        let regex = updater
            .regex_for(&DependencyChange::new("npm", "a.b", "1.0.0"))
            .unwrap();
        assert!(regex.is_match(r#""a.b": "0.1.0""#));
        assert!(!regex.is_match(r#""axb": "0.1.0""#));
    }

    #[tokio::test]
    async fn without_check_command_everything_is_valid() {
        let temp = TempDir::new().unwrap();
        let updater = npm_updater(Vec::new());
        let changes = vec![DependencyChange::new("npm", "left-pad", "1.3.0")];

        let result = updater
            .check_dependencies(&UpdateContext::new(temp.path()), &changes)
            .await
            .unwrap();
        assert_eq!(result.valid, changes);
        assert!(result.invalid.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn check_command_partitions_per_change() {
        let temp = TempDir::new().unwrap();
        let updater = npm_updater(vec![
            "sh".to_string(),
            "-c".to_string(),
            "test \"$0\" != 9.9.9".to_string(),
            "{{version}}".to_string(),
        ]);
        let good = DependencyChange::new("npm", "foo", "2.0.0");
        let bad = DependencyChange::new("npm", "bar", "9.9.9");

        let result = updater
            .check_dependencies(&UpdateContext::new(temp.path()), &[good.clone(), bad.clone()])
            .await
            .unwrap();
        assert_eq!(result.valid, vec![good]);
        assert_eq!(result.invalid, vec![bad]);
    }

    #[test]
    fn rewrites_every_differing_occurrence() {
        let regex = Regex::new(r"dep=(?P<version>\S+)").unwrap();
        let rewritten = rewrite_versions("dep=1 x dep=2 y dep=3", &regex, "2").unwrap();
        assert_eq!(rewritten, "dep=2 x dep=2 y dep=2");
        assert!(rewrite_versions("dep=2", &regex, "2").is_none());
    }
}
