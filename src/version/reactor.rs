//! Merging repository and reactor candidates
//!
//! The reactor is the set of artifacts built together in the current local
//! build. Its newest in-range version may replace the repository winner:
//! always when the reactor is preferred, otherwise only when there is no
//! repository winner or the reactor version is strictly newer.

use serde::Serialize;

use crate::version::bounds::BoundedVersionSet;
use crate::version::comparator::VersionComparator;
use crate::version::restriction::RangeSpec;
use crate::version::types::{Version, VersionPool};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactorPolicy {
    pub search_reactor: bool,
    pub prefer_reactor: bool,
}

/// How the final winner was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeDecision {
    /// Reactor search is disabled
    NotSearched,
    /// The reactor has no version inside the restriction
    NoReactorCandidate,
    /// The reactor only offers the current version and the repository has
    /// nothing newer
    ReactorMatchesCurrent,
    PreferReactor,
    /// No repository winner, so the reactor version is the only candidate
    ReactorOnlyCandidate,
    ReactorNewer,
    /// Ties keep the repository winner
    RepositorySameOrNewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub winner: Option<Version>,
    pub reactor_candidate: Option<Version>,
    pub decision: MergeDecision,
}

/// Apply reactor precedence to an already chosen reactor candidate
pub fn merge(
    current: &Version,
    repository_winner: Option<Version>,
    from_reactor: Option<Version>,
    prefer_reactor: bool,
    comparator: &dyn VersionComparator,
) -> MergeOutcome {
    let Some(reactor) = from_reactor else {
        return MergeOutcome {
            winner: repository_winner,
            reactor_candidate: None,
            decision: MergeDecision::NoReactorCandidate,
        };
    };

    let (winner, decision) = match repository_winner {
        None if &reactor == current => (None, MergeDecision::ReactorMatchesCurrent),
        _ if prefer_reactor => (Some(reactor.clone()), MergeDecision::PreferReactor),
        None => (Some(reactor.clone()), MergeDecision::ReactorOnlyCandidate),
        Some(repository) if comparator.is_newer(&reactor, &repository) => {
            (Some(reactor.clone()), MergeDecision::ReactorNewer)
        }
        Some(repository) => (Some(repository), MergeDecision::RepositorySameOrNewer),
    };

    MergeOutcome {
        winner,
        reactor_candidate: Some(reactor),
        decision,
    }
}

/// Find the reactor candidate under the repository query's restriction and
/// snapshot policy, then merge it with the repository winner
pub fn merge_with_reactor(
    current: &Version,
    repository_winner: Option<Version>,
    reactor_pool: &VersionPool,
    restriction: &RangeSpec,
    include_snapshots: bool,
    policy: ReactorPolicy,
    comparator: &dyn VersionComparator,
) -> MergeOutcome {
    if !policy.search_reactor {
        return MergeOutcome {
            winner: repository_winner,
            reactor_candidate: None,
            decision: MergeDecision::NotSearched,
        };
    }

    let from_reactor = BoundedVersionSet::new(reactor_pool, comparator)
        .newest_in_any(restriction.restrictions(), include_snapshots)
        .cloned();

    merge(
        current,
        repository_winner,
        from_reactor,
        policy.prefer_reactor,
        comparator,
    )
}
