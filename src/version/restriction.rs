//! Version range specifications
//!
//! Supports the bracket notation used by Maven-style build descriptors:
//! - `1.0` - soft requirement, restricts nothing
//! - `[1.0]` - exactly 1.0
//! - `[1.0,2.0)` - 1.0 <= v < 2.0
//! - `(,1.0]` - v <= 1.0
//! - `[1.5,)` - v >= 1.5
//! - `[1.0,2.0),[3.0,)` - union of restrictions

use crate::version::bounds::{Bound, VersionRange};
use crate::version::comparator::VersionComparator;
use crate::version::error::RangeError;
use crate::version::types::Version;

/// Parsed range specification: a union of ranges plus an optional
/// recommended version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    restrictions: Vec<VersionRange>,
    recommended: Option<Version>,
}

impl RangeSpec {
    pub fn parse(spec: &str) -> Result<Self, RangeError> {
        let mut process = spec.trim();
        if process.is_empty() {
            return Err(RangeError::invalid(spec, "empty specification"));
        }

        let mut restrictions = Vec::new();
        while process.starts_with('[') || process.starts_with('(') {
            let close = match (process.find(')'), process.find(']')) {
                (Some(paren), Some(bracket)) => paren.min(bracket),
                (Some(index), None) | (None, Some(index)) => index,
                (None, None) => return Err(RangeError::invalid(spec, "unbounded range")),
            };

            restrictions.push(parse_restriction(spec, &process[..=close])?);

            process = process[close + 1..].trim_start();
            if let Some(rest) = process.strip_prefix(',') {
                process = rest.trim_start();
            }
        }

        if process.is_empty() {
            return Ok(Self {
                restrictions,
                recommended: None,
            });
        }

        if !restrictions.is_empty() {
            return Err(RangeError::invalid(
                spec,
                "only fully-qualified sets allowed in multiple set scenario",
            ));
        }

        let recommended =
            Version::parse(process).map_err(|e| RangeError::invalid(spec, e.to_string()))?;
        Ok(Self {
            restrictions: vec![VersionRange::unbounded()],
            recommended: Some(recommended),
        })
    }

    /// A specification consisting of a single range
    pub fn from_range(range: VersionRange) -> Self {
        Self {
            restrictions: vec![range],
            recommended: None,
        }
    }

    pub fn unrestricted() -> Self {
        Self::from_range(VersionRange::unbounded())
    }

    pub fn restrictions(&self) -> &[VersionRange] {
        &self.restrictions
    }

    pub fn recommended(&self) -> Option<&Version> {
        self.recommended.as_ref()
    }

    pub fn contains(&self, version: &Version, comparator: &dyn VersionComparator) -> bool {
        self.restrictions
            .iter()
            .any(|r| r.contains(version, comparator))
    }
}

fn parse_restriction(spec: &str, restriction: &str) -> Result<VersionRange, RangeError> {
    let lower_inclusive = restriction.starts_with('[');
    let upper_inclusive = restriction.ends_with(']');
    let inner = restriction[1..restriction.len() - 1].trim();

    let Some((lower, upper)) = inner.split_once(',') else {
        if !lower_inclusive || !upper_inclusive {
            return Err(RangeError::invalid(
                spec,
                "single version must be surrounded by []",
            ));
        }
        let version = Version::parse(inner).map_err(|e| RangeError::invalid(spec, e.to_string()))?;
        return Ok(VersionRange::exact(version));
    };

    let (lower, upper) = (lower.trim(), upper.trim());
    if upper.contains(',') {
        return Err(RangeError::invalid(spec, "too many bounds in one range"));
    }
    if lower == upper {
        return Err(RangeError::invalid(
            spec,
            "range cannot have identical boundaries",
        ));
    }

    let lower = parse_bound(lower, lower_inclusive);
    let upper = parse_bound(upper, upper_inclusive);
    Ok(VersionRange::new(lower, upper))
}

fn parse_bound(value: &str, inclusive: bool) -> Bound {
    Bound::new(Version::parse(value).ok(), inclusive)
}
