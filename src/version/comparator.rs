//! Version ordering abstraction
//!
//! Components may order their versions differently, so every query takes a
//! comparator instead of relying on an ordering built into [`Version`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::version::comparators::{MavenComparator, SemverComparator};
use crate::version::types::{Segments, Version};

/// Trait for a total order over versions plus their semantic decomposition
///
/// Implementations must be consistent (antisymmetric, transitive) and match
/// the "increasing version order" of the metadata they are used with.
pub trait VersionComparator: Send + Sync {
    /// Returns the kind of ordering this comparator implements
    fn kind(&self) -> ComparatorKind;

    fn compare(&self, a: &Version, b: &Version) -> Ordering;

    /// Whether the version is an unstable, in-progress build
    fn is_snapshot(&self, version: &Version) -> bool;

    /// Numeric `major.minor.incremental` segments used to build update
    /// ranges, or None when the version cannot be decomposed
    fn segments(&self, version: &Version) -> Option<Segments> {
        version.segments()
    }

    fn is_newer(&self, candidate: &Version, than: &Version) -> bool {
        self.compare(candidate, than) == Ordering::Greater
    }
}

/// Selectable comparison rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparatorKind {
    /// Maven-style ordering with qualifier precedence
    #[default]
    Maven,
    /// Plain numeric triple ordering with semver pre-release rules
    Semver,
}

static MAVEN: MavenComparator = MavenComparator;
static SEMVER: SemverComparator = SemverComparator;

impl ComparatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparatorKind::Maven => "maven",
            ComparatorKind::Semver => "semver",
        }
    }

    /// The shared comparator instance for this kind
    pub fn comparator(&self) -> &'static dyn VersionComparator {
        match self {
            ComparatorKind::Maven => &MAVEN,
            ComparatorKind::Semver => &SEMVER,
        }
    }
}

impl fmt::Display for ComparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparatorKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maven" => Ok(ComparatorKind::Maven),
            "semver" => Ok(ComparatorKind::Semver),
            _ => Err(()),
        }
    }
}
