//! A single proposed dependency version bump.

use super::ChangeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a package ecosystem (e.g. `npm`, `mvn`).
///
/// Selects the updater responsible for a change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ecosystem(String);

impl Ecosystem {
    /// Creates an ecosystem identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ecosystem {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One proposed dependency version bump.
///
/// Equality is structural over ecosystem, dependency and version; this is what
/// pending records are deduplicated against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyChange {
    /// Ecosystem whose updater handles this change.
    pub ecosystem: Ecosystem,

    /// Ecosystem specific dependency coordinate.
    pub dependency: String,

    /// Version to move the dependency to.
    pub version: String,
}

impl DependencyChange {
    /// Creates a new change.
    pub fn new(
        ecosystem: impl Into<Ecosystem>,
        dependency: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            ecosystem: ecosystem.into(),
            dependency: dependency.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for DependencyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.ecosystem, self.dependency, self.version)
    }
}

impl FromStr for DependencyChange {
    type Err = ChangeError;

    /// Parses `ecosystem:dependency:version`.
    ///
    /// The dependency is everything between the first and the last `:`, so
    /// `mvn:org.example:core:1.2.0` keeps `org.example:core` intact.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ChangeError::InvalidFormat {
            input: input.to_string(),
        };

        let (ecosystem, rest) = input.split_once(':').ok_or_else(invalid)?;
        let (dependency, version) = rest.rsplit_once(':').ok_or_else(invalid)?;

        let (ecosystem, dependency, version) = (ecosystem.trim(), dependency.trim(), version.trim());
        if ecosystem.is_empty() || dependency.is_empty() || version.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(ecosystem, dependency, version))
    }
}
