//! Common types for version evaluation

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::version::comparator::VersionComparator;
use crate::version::error::VersionError;

/// Numeric `major.minor.incremental` triple of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments {
    pub major: u64,
    pub minor: u64,
    pub incremental: u64,
}

/// A parsed version string
///
/// Parsing follows the classic artifact version layout
/// `major.minor.incremental-(build|qualifier)`. Strings that do not fit
/// that layout keep the whole input as their qualifier and have no numeric
/// segments. Equality and hashing use the canonical string only; ordering
/// is always supplied by a [`VersionComparator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    canonical: String,
    major: Option<u64>,
    minor: Option<u64>,
    incremental: Option<u64>,
    build_number: Option<u64>,
    qualifier: Option<String>,
}

impl Version {
    /// Parse a version string. Only blank input is rejected.
    ///
    /// Examples:
    /// - "1.2.3" -> major 1, minor 2, incremental 3
    /// - "1.2-SNAPSHOT" -> major 1, minor 2, qualifier "SNAPSHOT"
    /// - "1.2-4" -> major 1, minor 2, build number 4
    /// - "1.2.3.4" -> qualifier "1.2.3.4" (not decomposable)
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let canonical = input.trim();
        if canonical.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut version = Version {
            canonical: canonical.to_string(),
            major: None,
            minor: None,
            incremental: None,
            build_number: None,
            qualifier: None,
        };

        let (numeric, trailing) = match canonical.split_once('-') {
            Some((numeric, trailing)) => (numeric, Some(trailing)),
            None => (canonical, None),
        };

        if let Some(trailing) = trailing {
            if trailing.len() == 1 || !trailing.starts_with('0') {
                match trailing.parse::<u64>() {
                    Ok(build) => version.build_number = Some(build),
                    Err(_) => version.qualifier = Some(trailing.to_string()),
                }
            } else {
                version.qualifier = Some(trailing.to_string());
            }
        }

        if !numeric.contains('.') && !numeric.starts_with('0') {
            match numeric.parse::<u64>() {
                Ok(major) => version.major = Some(major),
                Err(_) => version.fall_back(),
            }
            return Ok(version);
        }

        match parse_numeric_tokens(numeric) {
            Some(tokens) => {
                version.major = tokens.first().copied();
                version.minor = tokens.get(1).copied();
                version.incremental = tokens.get(2).copied();
            }
            None => version.fall_back(),
        }

        Ok(version)
    }

    /// Build a plain `major.minor.incremental` version
    pub fn from_segments(major: u64, minor: u64, incremental: u64) -> Self {
        Version {
            canonical: format!("{}.{}.{}", major, minor, incremental),
            major: Some(major),
            minor: Some(minor),
            incremental: Some(incremental),
            build_number: None,
            qualifier: None,
        }
    }

    fn fall_back(&mut self) {
        self.qualifier = Some(self.canonical.clone());
        self.major = None;
        self.minor = None;
        self.incremental = None;
        self.build_number = None;
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn major(&self) -> u64 {
        self.major.unwrap_or(0)
    }

    pub fn minor(&self) -> u64 {
        self.minor.unwrap_or(0)
    }

    pub fn incremental(&self) -> u64 {
        self.incremental.unwrap_or(0)
    }

    pub fn build_number(&self) -> Option<u64> {
        self.build_number
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// False when the whole string ended up as the qualifier, i.e. the
    /// numeric segments carry no information.
    pub fn is_decomposable(&self) -> bool {
        self.qualifier.as_deref() != Some(self.canonical.as_str())
    }

    /// Numeric segments, or None for versions that are not decomposable
    pub fn segments(&self) -> Option<Segments> {
        self.is_decomposable().then(|| Segments {
            major: self.major(),
            minor: self.minor(),
            incremental: self.incremental(),
        })
    }
}

/// Parse up to three dot-separated integers without leading zeros
fn parse_numeric_tokens(numeric: &str) -> Option<Vec<u64>> {
    if numeric.contains("..") || numeric.starts_with('.') || numeric.ends_with('.') {
        return None;
    }

    let tokens: Vec<&str> = numeric.split('.').collect();
    if tokens.len() > 3 {
        return None;
    }

    tokens
        .into_iter()
        .map(|token| {
            if token.len() > 1 && token.starts_with('0') {
                None
            } else {
                token.parse::<u64>().ok()
            }
        })
        .collect()
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Version::parse(&value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.canonical
    }
}

/// Identity of a tracked component (`group:artifact`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
}

impl Coordinate {
    pub fn new(group_id: &str, artifact_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            Some((group, artifact))
                if !group.is_empty() && !artifact.is_empty() && !artifact.contains(':') =>
            {
                Ok(Coordinate::new(group, artifact))
            }
            _ => Err(format!("expected 'group:artifact', got '{}'", s)),
        }
    }
}

impl TryFrom<String> for Coordinate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coordinate> for String {
    fn from(value: Coordinate) -> Self {
        value.to_string()
    }
}

/// Known versions of one component, ascending under a comparator and
/// deduplicated by canonical string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPool {
    versions: Vec<Version>,
}

impl VersionPool {
    pub fn new(versions: impl IntoIterator<Item = Version>, comparator: &dyn VersionComparator) -> Self {
        let unique: IndexSet<Version> = versions.into_iter().collect();
        let mut versions: Vec<Version> = unique.into_iter().collect();
        versions.sort_by(|a, b| comparator.compare(a, b));
        Self { versions }
    }

    /// Build a pool from raw provider strings, skipping blank entries
    pub fn from_strings(raw: &[String], comparator: &dyn VersionComparator) -> Self {
        let versions = raw.iter().filter_map(|v| {
            Version::parse(v)
                .inspect_err(|e| warn!("Skipping version '{}': {}", v, e))
                .ok()
        });
        Self::new(versions, comparator)
    }

    pub fn as_slice(&self) -> &[Version] {
        &self.versions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Version> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
