//! Plain numeric ordering backed by the `semver` crate
//!
//! Partial versions are padded (`1` -> `1.0.0`, `1.2` -> `1.2.0`) and a
//! leading `v` is ignored, so `v1.2`, `1.2` and `1.2.0` compare equal.
//! Versions that still do not parse sort before every parsable version and
//! compare lexically among themselves.

use std::cmp::Ordering;

use crate::version::comparator::{ComparatorKind, VersionComparator};
use crate::version::types::{Segments, Version};

pub struct SemverComparator;

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "v1.2.3" -> Version(1, 2, 3)
/// - "1.2-beta.1" -> Version(1, 2, 0, pre = beta.1)
pub fn parse_version(version: &str) -> Option<::semver::Version> {
    let version = version.strip_prefix('v').unwrap_or(version);
    let split_at = version.find(['-', '+']).unwrap_or(version.len());
    let (core, rest) = version.split_at(split_at);

    let parts: Vec<&str> = core.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0{}", parts[0], rest),
        2 => format!("{}.{}.0{}", parts[0], parts[1], rest),
        _ => version.to_string(),
    };
    ::semver::Version::parse(&normalized).ok()
}

impl VersionComparator for SemverComparator {
    fn kind(&self) -> ComparatorKind {
        ComparatorKind::Semver
    }

    fn compare(&self, a: &Version, b: &Version) -> Ordering {
        match (parse_version(a.as_str()), parse_version(b.as_str())) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => a.as_str().cmp(b.as_str()),
        }
    }

    fn is_snapshot(&self, version: &Version) -> bool {
        version.as_str().to_ascii_uppercase().ends_with("SNAPSHOT")
            || parse_version(version.as_str()).is_some_and(|v| !v.pre.is_empty())
    }

    fn segments(&self, version: &Version) -> Option<Segments> {
        parse_version(version.as_str()).map(|v| Segments {
            major: v.major,
            minor: v.minor,
            incremental: v.patch,
        })
    }
}
