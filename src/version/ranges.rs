//! Canonical update ranges derived from a current version
//!
//! - incremental: `[current, major.(minor+1).0)`
//! - minor: `[current, (major+1).0.0)`
//! - major: `[current,)`
//!
//! Each range contains the previous one. When the comparator cannot
//! decompose the current version into numeric segments, all three ranges
//! fall back to the major range. A boundary segment that cannot be
//! incremented falls back to the next wider boundary, keeping the ranges
//! nested.

use serde::Serialize;

use crate::version::bounds::{Bound, VersionRange};
use crate::version::comparator::VersionComparator;
use crate::version::types::{Segments, Version};

/// Magnitude of a version change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Segment {
    Incremental,
    Minor,
    Major,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Incremental => "incremental",
            Segment::Minor => "minor",
            Segment::Major => "major",
        }
    }
}

fn next_minor(s: Segments) -> Option<Version> {
    s.minor
        .checked_add(1)
        .map(|minor| Version::from_segments(s.major, minor, 0))
}

fn next_major(s: Segments) -> Option<Version> {
    s.major
        .checked_add(1)
        .map(|major| Version::from_segments(major, 0, 0))
}

pub fn incremental_range(current: &Version, comparator: &dyn VersionComparator) -> VersionRange {
    comparator
        .segments(current)
        .and_then(|s| next_minor(s).or_else(|| next_major(s)))
        .map(|upper| upper_exclusive(current, upper))
        .unwrap_or_else(|| major_range(current))
}

pub fn minor_range(current: &Version, comparator: &dyn VersionComparator) -> VersionRange {
    comparator
        .segments(current)
        .and_then(next_major)
        .map(|upper| upper_exclusive(current, upper))
        .unwrap_or_else(|| major_range(current))
}

pub fn major_range(current: &Version) -> VersionRange {
    VersionRange::new(Bound::Inclusive(current.clone()), Bound::Unbounded)
}

fn upper_exclusive(current: &Version, upper: Version) -> VersionRange {
    VersionRange::new(Bound::Inclusive(current.clone()), Bound::Exclusive(upper))
}

/// The three nested update ranges for one current version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRanges {
    pub incremental: VersionRange,
    pub minor: VersionRange,
    pub major: VersionRange,
    /// True when the current version could not be decomposed and every
    /// range is the unbounded major range
    pub degraded: bool,
}

impl UpdateRanges {
    pub fn new(current: &Version, comparator: &dyn VersionComparator) -> Self {
        Self {
            incremental: incremental_range(current, comparator),
            minor: minor_range(current, comparator),
            major: major_range(current),
            degraded: comparator.segments(current).is_none(),
        }
    }

    pub fn get(&self, segment: Segment) -> &VersionRange {
        match segment {
            Segment::Incremental => &self.incremental,
            Segment::Minor => &self.minor,
            Segment::Major => &self.major,
        }
    }
}
