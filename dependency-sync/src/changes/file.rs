//! Proposed changes loaded from a TOML file.

use super::{ChangeError, DependencyChange};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Contents of a change file.
///
/// ```toml
/// [[change]]
/// ecosystem = "npm"
/// dependency = "left-pad"
/// version = "1.3.0"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeFile {
    /// Proposed changes, in file order.
    #[serde(default, rename = "change")]
    pub changes: Vec<DependencyChange>,
}

impl ChangeFile {
    /// Loads a change file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ChangeError> {
        debug!(path = %path.display(), "Loading change file");

        let content = std::fs::read_to_string(path).map_err(|e| ChangeError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ChangeError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
