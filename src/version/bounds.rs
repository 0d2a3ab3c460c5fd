//! Bounded queries over a version pool
//!
//! A [`VersionRange`] is a pair of optional, inclusive or exclusive bounds.
//! [`BoundedVersionSet`] answers "which versions of this pool fall inside
//! these bounds under this snapshot policy" without re-sorting the pool.
//! A range whose lower bound lies above its upper bound simply matches
//! nothing.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::version::comparator::VersionComparator;
use crate::version::types::{Version, VersionPool};

/// One end of a range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "version", rename_all = "camelCase")]
pub enum Bound {
    Unbounded,
    Inclusive(Version),
    Exclusive(Version),
}

impl Bound {
    /// Build a bound from an optional value and an inclusivity flag
    pub fn new(value: Option<Version>, inclusive: bool) -> Self {
        match value {
            None => Bound::Unbounded,
            Some(v) if inclusive => Bound::Inclusive(v),
            Some(v) => Bound::Exclusive(v),
        }
    }

    pub fn value(&self) -> Option<&Version> {
        match self {
            Bound::Unbounded => None,
            Bound::Inclusive(v) | Bound::Exclusive(v) => Some(v),
        }
    }

    pub fn is_inclusive(&self) -> bool {
        matches!(self, Bound::Inclusive(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRange {
    pub lower: Bound,
    pub upper: Bound,
}

impl VersionRange {
    pub fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// Range from the flat `(lower, upper, include_lower, include_upper)` form
    pub fn between(
        lower: Option<Version>,
        upper: Option<Version>,
        include_lower: bool,
        include_upper: bool,
    ) -> Self {
        Self {
            lower: Bound::new(lower, include_lower),
            upper: Bound::new(upper, include_upper),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(Bound::Unbounded, Bound::Unbounded)
    }

    /// `[version,version]`
    pub fn exact(version: Version) -> Self {
        Self::new(Bound::Inclusive(version.clone()), Bound::Inclusive(version))
    }

    /// Check a version against both bounds, ignoring snapshot policy
    pub fn check(&self, version: &Version, comparator: &dyn VersionComparator) -> Verdict {
        let below_lower = match &self.lower {
            Bound::Unbounded => false,
            Bound::Inclusive(lower) => comparator.compare(version, lower) == Ordering::Less,
            Bound::Exclusive(lower) => comparator.compare(version, lower) != Ordering::Greater,
        };
        if below_lower {
            return Verdict::BelowLower;
        }

        let above_upper = match &self.upper {
            Bound::Unbounded => false,
            Bound::Inclusive(upper) => comparator.compare(version, upper) == Ordering::Greater,
            Bound::Exclusive(upper) => comparator.compare(version, upper) != Ordering::Less,
        };
        if above_upper {
            return Verdict::AboveUpper;
        }

        Verdict::Accepted
    }

    pub fn contains(&self, version: &Version, comparator: &dyn VersionComparator) -> bool {
        self.check(version, comparator) == Verdict::Accepted
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower.is_inclusive() { '[' } else { '(' };
        let close = if self.upper.is_inclusive() { ']' } else { ')' };
        let lower = self.lower.value().map(Version::as_str).unwrap_or("");
        let upper = self.upper.value().map(Version::as_str).unwrap_or("");
        write!(f, "{}{},{}{}", open, lower, upper, close)
    }
}

/// Why a version was kept or dropped by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Accepted,
    /// Dropped because snapshots are excluded
    Snapshot,
    BelowLower,
    AboveUpper,
}

/// Decision trace entry for one pool version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub version: Version,
    pub verdict: Verdict,
}

/// Read-only view of a pool under one comparator
#[derive(Clone, Copy)]
pub struct BoundedVersionSet<'a> {
    pool: &'a VersionPool,
    comparator: &'a dyn VersionComparator,
}

impl<'a> BoundedVersionSet<'a> {
    pub fn new(pool: &'a VersionPool, comparator: &'a dyn VersionComparator) -> Self {
        Self { pool, comparator }
    }

    fn verdict(&self, version: &Version, range: &VersionRange, include_snapshots: bool) -> Verdict {
        match range.check(version, self.comparator) {
            Verdict::Accepted if !include_snapshots && self.comparator.is_snapshot(version) => {
                Verdict::Snapshot
            }
            verdict => verdict,
        }
    }

    fn accepts(&self, version: &Version, range: &VersionRange, include_snapshots: bool) -> bool {
        self.verdict(version, range, include_snapshots) == Verdict::Accepted
    }

    /// All versions inside the range, ascending
    pub fn versions_in_bounds(&self, range: &VersionRange, include_snapshots: bool) -> Vec<Version> {
        self.pool
            .iter()
            .filter(|v| self.accepts(v, range, include_snapshots))
            .cloned()
            .collect()
    }

    /// Newest version inside the range, scanning from the top of the pool
    pub fn newest(&self, range: &VersionRange, include_snapshots: bool) -> Option<&'a Version> {
        self.pool
            .as_slice()
            .iter()
            .rev()
            .find(|v| self.accepts(v, range, include_snapshots))
    }

    /// Oldest version inside the range, scanning from the bottom of the pool
    pub fn oldest(&self, range: &VersionRange, include_snapshots: bool) -> Option<&'a Version> {
        self.pool
            .as_slice()
            .iter()
            .find(|v| self.accepts(v, range, include_snapshots))
    }

    /// Newest version accepted by any of the ranges
    pub fn newest_in_any(
        &self,
        ranges: &[VersionRange],
        include_snapshots: bool,
    ) -> Option<&'a Version> {
        self.pool
            .as_slice()
            .iter()
            .rev()
            .find(|v| ranges.iter().any(|r| self.accepts(v, r, include_snapshots)))
    }

    /// Per-version trace of what the query kept and why the rest was dropped
    pub fn explain(&self, range: &VersionRange, include_snapshots: bool) -> Vec<Decision> {
        self.pool
            .iter()
            .map(|v| Decision {
                version: v.clone(),
                verdict: self.verdict(v, range, include_snapshots),
            })
            .collect()
    }
}
