//! `[[ecosystem]]` entries.

use serde::Deserialize;
use std::path::PathBuf;

/// Manifest rewriting rules for one ecosystem.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EcosystemConfig {
    /// Ecosystem identifier used in changes (e.g. `npm`).
    pub id: String,

    /// Manifest paths relative to the repository root.
    pub files: Vec<PathBuf>,

    /// Handlebars template rendering to a regex with a `version` group.
    pub pattern: String,

    /// Optional command validating one change; arguments are handlebars templates.
    #[serde(default)]
    pub check_command: Vec<String>,
}
