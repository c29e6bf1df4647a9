//! Textual encoding of deferred changes inside issue comments.

use crate::changes::DependencyChange;

/// Hidden marker identifying a pending changes comment.
pub const PENDING_MARKER: &str = "<!-- dependency-sync:pending -->";

const TABLE_HEADER: &str = "| Ecosystem | Dependency | Version |";
const TABLE_SEPARATOR: &str = "| --- | --- | --- |";

/// Encodes deferred changes as a markdown comment.
#[must_use]
pub fn encode_pending_changes(changes: &[DependencyChange]) -> String {
    let mut text = format!(
        "{PENDING_MARKER}\nThese dependency updates failed validation and will be retried on the next run:\n\n{TABLE_HEADER}\n{TABLE_SEPARATOR}\n"
    );
    for change in changes {
        text.push_str(&format!(
            "| {} | {} | {} |\n",
            change.ecosystem, change.dependency, change.version
        ));
    }
    text
}

/// Decodes deferred changes from a comment written by [`encode_pending_changes`].
///
/// Returns `None` if `text` is not a pending changes comment.
#[must_use]
pub fn decode_pending_changes(text: &str) -> Option<Vec<DependencyChange>> {
    let (_, table) = text.split_once(PENDING_MARKER)?;

    let changes = table
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('|'))
        .filter_map(|line| {
            let cells: Vec<&str> = line
                .trim_matches('|')
                .split('|')
                .map(str::trim)
                .collect();
            match cells.as_slice() {
                [ecosystem, dependency, version]
                    if *ecosystem != "Ecosystem"
                        && !ecosystem.starts_with("---")
                        && !ecosystem.is_empty()
                        && !dependency.is_empty()
                        && !version.is_empty() =>
                {
                    Some(DependencyChange::new(*ecosystem, *dependency, *version))
                }
                _ => None,
            }
        })
        .collect();

    Some(changes)
}

/// Finds the most recent pending changes comment.
#[must_use]
pub fn latest_pending_changes<'a, I>(comments: I) -> Option<Vec<DependencyChange>>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: DoubleEndedIterator,
{
    comments.into_iter().rev().find_map(decode_pending_changes)
}
