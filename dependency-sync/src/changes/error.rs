//! Change parsing error types.

use thiserror::Error;

/// Errors that can occur while parsing or loading proposed changes.
#[derive(Debug, Error)]
pub enum ChangeError {
    /// A change was not in `ecosystem:dependency:version` form.
    #[error("Invalid change '{input}': expected ecosystem:dependency:version")]
    InvalidFormat { input: String },

    /// Failed to read a change file.
    #[error("Failed to read change file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a change file.
    #[error("Failed to parse change file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
