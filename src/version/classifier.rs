//! Update classification for a single component

use serde::Serialize;

use crate::version::bounds::{Bound, BoundedVersionSet, Decision, VersionRange};
use crate::version::comparator::VersionComparator;
use crate::version::ranges::{Segment, UpdateRanges};
use crate::version::types::{Coordinate, Version, VersionPool};

/// Newest available version per update tier
///
/// Each tier may hold the current version itself (ranges are inclusive at
/// the bottom); whether anything is an actual update is derived by
/// [`UpdateSummary::has_updates`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    coordinate: Coordinate,
    current: Version,
    latest_incremental: Option<Version>,
    latest_minor: Option<Version>,
    latest_major: Option<Version>,
}

impl UpdateSummary {
    pub fn new(
        coordinate: Coordinate,
        current: Version,
        latest_incremental: Option<Version>,
        latest_minor: Option<Version>,
        latest_major: Option<Version>,
    ) -> Self {
        Self {
            coordinate,
            current,
            latest_incremental,
            latest_minor,
            latest_major,
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn current(&self) -> &Version {
        &self.current
    }

    pub fn latest_incremental(&self) -> Option<&Version> {
        self.latest_incremental.as_ref()
    }

    pub fn latest_minor(&self) -> Option<&Version> {
        self.latest_minor.as_ref()
    }

    pub fn latest_major(&self) -> Option<&Version> {
        self.latest_major.as_ref()
    }

    pub fn latest(&self, segment: Segment) -> Option<&Version> {
        match segment {
            Segment::Incremental => self.latest_incremental(),
            Segment::Minor => self.latest_minor(),
            Segment::Major => self.latest_major(),
        }
    }

    /// Whether the summary is worth reporting
    ///
    /// Checked in order: `show_all`, a current version the comparator
    /// cannot decompose (reported rather than hidden), then any tier
    /// strictly newer than the current version.
    pub fn has_updates(&self, comparator: &dyn VersionComparator, show_all: bool) -> bool {
        if show_all {
            return true;
        }

        if comparator.segments(&self.current).is_none() {
            return true;
        }

        [Segment::Incremental, Segment::Minor, Segment::Major]
            .into_iter()
            .filter_map(|segment| self.latest(segment))
            .any(|candidate| comparator.is_newer(candidate, &self.current))
    }
}

/// Query the newest version of each update tier
pub fn summarize(
    coordinate: Coordinate,
    current: Version,
    pool: &VersionPool,
    comparator: &dyn VersionComparator,
    include_snapshots: bool,
) -> UpdateSummary {
    let set = BoundedVersionSet::new(pool, comparator);
    let ranges = UpdateRanges::new(&current, comparator);
    let newest = |range: &VersionRange| set.newest(range, include_snapshots).cloned();

    UpdateSummary {
        latest_incremental: newest(&ranges.incremental),
        latest_minor: newest(&ranges.minor),
        latest_major: newest(&ranges.major),
        coordinate,
        current,
    }
}

/// Per-version decisions of one tier query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierTrace {
    pub segment: Segment,
    pub range: VersionRange,
    pub decisions: Vec<Decision>,
}

/// Explain which versions each tier query kept and why the rest was dropped
pub fn explain_tiers(
    current: &Version,
    pool: &VersionPool,
    comparator: &dyn VersionComparator,
    include_snapshots: bool,
) -> Vec<TierTrace> {
    let set = BoundedVersionSet::new(pool, comparator);
    let ranges = UpdateRanges::new(current, comparator);

    [Segment::Incremental, Segment::Minor, Segment::Major]
        .into_iter()
        .map(|segment| {
            let range = ranges.get(segment).clone();
            TierTrace {
                segment,
                decisions: set.explain(&range, include_snapshots),
                range,
            }
        })
        .collect()
}

/// Next and latest version of each tier, excluding the current version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetails {
    pub next_incremental: Option<Version>,
    pub latest_incremental: Option<Version>,
    pub next_minor: Option<Version>,
    pub latest_minor: Option<Version>,
    pub next_major: Option<Version>,
    pub latest_major: Option<Version>,
    /// Every version newer than the current one, ascending
    pub all: Vec<Version>,
}

impl UpdateDetails {
    /// Oldest version newer than the current one
    pub fn next_version(&self) -> Option<&Version> {
        self.all.first()
    }
}

pub fn update_details(
    current: &Version,
    pool: &VersionPool,
    comparator: &dyn VersionComparator,
    include_snapshots: bool,
) -> UpdateDetails {
    let set = BoundedVersionSet::new(pool, comparator);
    let ranges = UpdateRanges::new(current, comparator);
    let newer_only = |range: &VersionRange| VersionRange {
        lower: Bound::Exclusive(current.clone()),
        upper: range.upper.clone(),
    };

    let incremental = newer_only(&ranges.incremental);
    let minor = newer_only(&ranges.minor);
    let major = newer_only(&ranges.major);

    UpdateDetails {
        next_incremental: set.oldest(&incremental, include_snapshots).cloned(),
        latest_incremental: set.newest(&incremental, include_snapshots).cloned(),
        next_minor: set.oldest(&minor, include_snapshots).cloned(),
        latest_minor: set.newest(&minor, include_snapshots).cloned(),
        next_major: set.oldest(&major, include_snapshots).cloned(),
        latest_major: set.newest(&major, include_snapshots).cloned(),
        all: set.versions_in_bounds(&major, include_snapshots),
    }
}

/// Smallest update tier containing the candidate, or None when the
/// candidate is not newer than the current version
pub fn classify_change(
    current: &Version,
    candidate: &Version,
    comparator: &dyn VersionComparator,
) -> Option<Segment> {
    if !comparator.is_newer(candidate, current) {
        return None;
    }

    let ranges = UpdateRanges::new(current, comparator);
    [Segment::Incremental, Segment::Minor, Segment::Major]
        .into_iter()
        .find(|segment| ranges.get(*segment).contains(candidate, comparator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::bounds::Verdict;
    use crate::version::comparators::{MavenComparator, SemverComparator};
    use rstest::rstest;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn pool(versions: &[&str]) -> VersionPool {
        VersionPool::new(versions.iter().map(|s| v(s)), &MavenComparator)
    }

    fn coordinate() -> Coordinate {
        Coordinate::new("org.example", "lib")
    }

    const POOL: [&str; 8] = [
        "1.2.3", "1.2.4", "1.2.5", "1.3.0", "1.4.0-SNAPSHOT", "1.9.1", "2.0.0", "3.1.0",
    ];

    #[test]
    fn summarize_finds_newest_per_tier() {
        let summary = summarize(coordinate(), v("1.2.3"), &pool(&POOL), &MavenComparator, false);

        assert_eq!(summary.latest_incremental(), Some(&v("1.2.5")));
        assert_eq!(summary.latest_minor(), Some(&v("1.9.1")));
        assert_eq!(summary.latest_major(), Some(&v("3.1.0")));
        assert!(summary.has_updates(&MavenComparator, false));
    }

    #[test]
    fn summarize_keeps_current_when_it_is_newest() {
        let summary = summarize(coordinate(), v("3.1.0"), &pool(&POOL), &MavenComparator, false);

        assert_eq!(summary.latest_incremental(), Some(&v("3.1.0")));
        assert_eq!(summary.latest_minor(), Some(&v("3.1.0")));
        assert_eq!(summary.latest_major(), Some(&v("3.1.0")));
        assert!(!summary.has_updates(&MavenComparator, false));
    }

    #[test]
    fn summarize_is_idempotent() {
        let pool = pool(&POOL);
        let first = summarize(coordinate(), v("1.2.3"), &pool, &MavenComparator, true);
        let second = summarize(coordinate(), v("1.2.3"), &pool, &MavenComparator, true);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn summarize_with_empty_pool_has_no_candidates() {
        let summary = summarize(
            coordinate(),
            v("1.0"),
            &VersionPool::default(),
            &MavenComparator,
            false,
        );

        assert_eq!(summary.latest_major(), None);
        assert!(!summary.has_updates(&MavenComparator, false));
    }

    #[rstest]
    #[case("1.0", None, false, false)]
    #[case("1.0", None, true, true)]
    #[case("1.0", Some("1.0"), false, false)]
    #[case("1.0", Some("1.1"), false, true)]
    #[case("1.0", Some("0.9"), false, false)]
    #[case("RELEASE", None, false, true)]
    fn has_updates_follows_decision_order(
        #[case] current: &str,
        #[case] latest: Option<&str>,
        #[case] show_all: bool,
        #[case] expected: bool,
    ) {
        let summary = UpdateSummary::new(coordinate(), v(current), None, None, latest.map(v));

        assert_eq!(summary.has_updates(&MavenComparator, show_all), expected);
    }

    #[rstest]
    #[case("v1.0.0", &["v1.0.0"], false)]
    #[case("v1.0.0", &["v1.0.0", "v1.0.1"], true)]
    #[case("latest", &["1.0.0"], true)]
    fn has_updates_uses_comparator_decomposition(
        #[case] current: &str,
        #[case] available: &[&str],
        #[case] expected: bool,
    ) {
        let pool = VersionPool::new(available.iter().map(|s| v(s)), &SemverComparator);
        let summary = summarize(coordinate(), v(current), &pool, &SemverComparator, false);

        assert_eq!(summary.has_updates(&SemverComparator, false), expected);
    }

    #[test]
    fn semver_short_spellings_land_in_their_own_tier() {
        let pool = VersionPool::new([v("1.2.0"), v("1.3"), v("2")], &SemverComparator);

        let summary = summarize(coordinate(), v("1.2.0"), &pool, &SemverComparator, false);

        assert_eq!(summary.latest_incremental(), Some(&v("1.2.0")));
        assert_eq!(summary.latest_minor(), Some(&v("1.3")));
        assert_eq!(summary.latest_major(), Some(&v("2")));
        assert_eq!(
            classify_change(&v("1.2.0"), &v("2"), &SemverComparator),
            Some(Segment::Major)
        );
        assert_eq!(
            classify_change(&v("1.2.0"), &v("1.3"), &SemverComparator),
            Some(Segment::Minor)
        );
    }

    #[test]
    fn explain_tiers_reports_each_boundary_decision() {
        let traces = explain_tiers(&v("1.2.3"), &pool(&["1.2.4", "1.3.0", "2.0.0"]), &MavenComparator, false);

        let verdicts: Vec<(Segment, Vec<Verdict>)> = traces
            .iter()
            .map(|t| (t.segment, t.decisions.iter().map(|d| d.verdict).collect()))
            .collect();
        assert_eq!(
            verdicts,
            vec![
                (Segment::Incremental, vec![Verdict::Accepted, Verdict::AboveUpper, Verdict::AboveUpper]),
                (Segment::Minor, vec![Verdict::Accepted, Verdict::Accepted, Verdict::AboveUpper]),
                (Segment::Major, vec![Verdict::Accepted, Verdict::Accepted, Verdict::Accepted]),
            ]
        );
        assert_eq!(traces[0].range.to_string(), "[1.2.3,1.3.0)");
    }

    #[test]
    fn undecomposable_current_uses_major_range_for_every_tier() {
        let summary = summarize(
            coordinate(),
            v("1.2.3.4"),
            &pool(&["1.2.3", "1.2.4", "2.0.0"]),
            &MavenComparator,
            false,
        );

        assert_eq!(summary.latest_incremental(), Some(&v("2.0.0")));
        assert_eq!(summary.latest_minor(), Some(&v("2.0.0")));
        assert_eq!(summary.latest_major(), Some(&v("2.0.0")));
        assert!(summary.has_updates(&MavenComparator, false));
    }

    #[test]
    fn update_details_reports_next_and_latest() {
        let details = update_details(&v("1.2.3"), &pool(&POOL), &MavenComparator, false);

        assert_eq!(details.next_incremental, Some(v("1.2.4")));
        assert_eq!(details.latest_incremental, Some(v("1.2.5")));
        assert_eq!(details.next_minor, Some(v("1.2.4")));
        assert_eq!(details.latest_minor, Some(v("1.9.1")));
        assert_eq!(details.next_major, Some(v("1.2.4")));
        assert_eq!(details.latest_major, Some(v("3.1.0")));
        assert_eq!(details.next_version(), Some(&v("1.2.4")));
        assert_eq!(
            details.all,
            vec![v("1.2.4"), v("1.2.5"), v("1.3.0"), v("1.9.1"), v("2.0.0"), v("3.1.0")]
        );
    }

    #[test]
    fn update_details_for_latest_version_is_empty() {
        let details = update_details(&v("3.1.0"), &pool(&POOL), &MavenComparator, true);

        assert_eq!(details, UpdateDetails::default());
        assert_eq!(details.next_version(), None);
    }

    #[rstest]
    #[case("1.2.3", "1.2.4", Some(Segment::Incremental))]
    #[case("1.2.3", "1.2.3-1", Some(Segment::Incremental))]
    #[case("1.2.3", "1.3.0", Some(Segment::Minor))]
    #[case("1.2.3", "1.10.0", Some(Segment::Minor))]
    #[case("1.2.3", "2.0.0", Some(Segment::Major))]
    #[case("1.2.3", "1.2.3", None)]
    #[case("1.2.3", "1.0.0", None)]
    #[case("RELEASE", "2.0.0", Some(Segment::Incremental))]
    fn classify_change_returns_smallest_tier(
        #[case] current: &str,
        #[case] candidate: &str,
        #[case] expected: Option<Segment>,
    ) {
        assert_eq!(
            classify_change(&v(current), &v(candidate), &MavenComparator),
            expected
        );
    }

    // A pre-release of the next boundary sorts below it, so it stays in the
    // lower tier
    #[rstest]
    #[case("1.3.0-rc.1", Some(Segment::Incremental))]
    #[case("2.0.0-rc.1", Some(Segment::Minor))]
    #[case("2.1.0-rc.1", Some(Segment::Major))]
    fn classify_change_places_prereleases_below_boundary(
        #[case] candidate: &str,
        #[case] expected: Option<Segment>,
    ) {
        assert_eq!(
            classify_change(&v("1.2.3"), &v(candidate), &SemverComparator),
            expected
        );
    }
}
