//! Titles, branch names and Handlebars rendering.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, ChangeSummary, TemplateRenderer};

use crate::changes::{describe_changes, DependencyChange};

/// Generates the logical title prefix shared by every pull request of a change-set.
///
/// Format: "{title_prefix} {topic}"
#[must_use]
pub fn generate_title_prefix(title_prefix: &str, topic: &str) -> String {
    format!("{} {}", title_prefix.trim(), topic.trim())
}

/// Generates the pull request title for the published changes.
///
/// Format: "{prefix}: {dependency} {version}, ..."
#[must_use]
pub fn generate_pr_title(prefix: &str, changes: &[DependencyChange]) -> String {
    format!("{prefix}: {}", describe_changes(changes))
}

/// Returns true if `title` belongs to the change-set identified by `prefix`.
#[must_use]
pub fn matches_title_prefix(title: &str, prefix: &str) -> bool {
    title
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(':'))
}

/// Generates a fresh branch name for a new pull request.
///
/// Format: "{branch_prefix}-{uuid}"
#[must_use]
pub fn generate_branch_name(branch_prefix: &str) -> String {
    format!("{branch_prefix}-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_title_from_prefix_and_changes() {
        let prefix = generate_title_prefix("chore(deps): update", "dependencies");
        let title = generate_pr_title(
            &prefix,
            &[DependencyChange::new("npm", "left-pad", "1.3.0")],
        );
        assert_eq!(title, "chore(deps): update dependencies: left-pad 1.3.0");
    }

    #[test]
    fn title_prefix_requires_separator() {
        let prefix = "chore(deps): update dependencies";
        assert!(matches_title_prefix(
            "chore(deps): update dependencies: left-pad 1.3.0",
            prefix
        ));
        assert!(!matches_title_prefix(
            "chore(deps): update dependencies-frontend: left-pad 1.3.0",
            prefix
        ));
        assert!(!matches_title_prefix("Unrelated", prefix));
    }

    #[test]
    fn branch_names_are_unique() {
        let a = generate_branch_name("dependency-sync");
        let b = generate_branch_name("dependency-sync");
        assert!(a.starts_with("dependency-sync-"));
        assert_ne!(a, b);
    }
}
