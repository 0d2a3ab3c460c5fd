//! Batch evaluation of configured components
//!
//! Every component is validated before any metadata is fetched. Fetches then
//! run in parallel; a metadata failure skips that component and the batch
//! carries on.

use std::cmp::Ordering;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ComponentConfig, ConfigError, UpdatesConfig};
use crate::version::bounds::BoundedVersionSet;
use crate::version::classifier::{
    TierTrace, UpdateDetails, UpdateSummary, explain_tiers, summarize, update_details,
};
use crate::version::comparator::{ComparatorKind, VersionComparator};
use crate::version::error::{EvaluationError, MetadataError};
use crate::version::provider::{MetadataProvider, ReactorSource};
use crate::version::reactor::{MergeOutcome, ReactorPolicy, merge_with_reactor};
use crate::version::restriction::RangeSpec;
use crate::version::types::{Coordinate, Version, VersionPool};

/// A component whose configuration has been fully parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedComponent {
    pub coordinate: Coordinate,
    pub property: Option<String>,
    pub current: Version,
    pub restriction: RangeSpec,
    pub comparator: ComparatorKind,
    pub include_snapshots: bool,
    pub reactor: ReactorPolicy,
    pub explain: bool,
}

impl PreparedComponent {
    pub fn prepare(config: &ComponentConfig, global_snapshots: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            coordinate: config.coordinate.clone(),
            property: config.property.clone(),
            current: config.current_version()?,
            restriction: config.restriction()?,
            comparator: config.comparator,
            include_snapshots: config.effective_include_snapshots(global_snapshots),
            reactor: config.reactor_policy(),
            explain: false,
        })
    }
}

/// Parse every non-excluded component, failing on the first invalid one
pub fn prepare_all(config: &UpdatesConfig) -> Result<Vec<PreparedComponent>, ConfigError> {
    config
        .components
        .iter()
        .filter(|component| {
            let excluded = config.is_excluded(&component.coordinate);
            if excluded {
                debug!("Skipping excluded component {}", component.coordinate);
            }
            !excluded
        })
        .map(|component| {
            PreparedComponent::prepare(component, config.include_snapshots).map(|prepared| {
                PreparedComponent {
                    explain: config.explain,
                    ..prepared
                }
            })
        })
        .collect()
}

/// Evaluation result for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdate {
    pub coordinate: Coordinate,
    pub property: Option<String>,
    pub current: Version,
    pub comparator: ComparatorKind,
    pub summary: UpdateSummary,
    pub details: UpdateDetails,
    /// Newest repository version inside the restriction, None when that is
    /// the current version
    pub repository_winner: Option<Version>,
    pub merge: MergeOutcome,
    /// Tier query decisions, present when explaining is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TierTrace>>,
}

impl ComponentUpdate {
    pub fn has_updates(&self, show_all: bool) -> bool {
        self.summary
            .has_updates(self.comparator.comparator(), show_all)
    }

    /// Final winner after the reactor merge
    pub fn recommended(&self) -> Option<&Version> {
        self.merge.winner.as_ref()
    }

    /// The recommended version when it is strictly newer than the current one
    pub fn newer_recommendation(&self) -> Option<&Version> {
        self.recommended()
            .filter(|winner| self.comparator.comparator().is_newer(winner, &self.current))
    }

    /// Name shown in property output
    pub fn display_name(&self) -> String {
        self.property
            .clone()
            .unwrap_or_else(|| self.coordinate.to_string())
    }
}

/// A component skipped because its metadata could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFailure {
    pub coordinate: Coordinate,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub updates: Vec<ComponentUpdate>,
    pub failures: Vec<ComponentFailure>,
}

/// Newest version inside any of the restriction's ranges
///
/// Returns None when that version is the current one.
pub fn repository_winner(
    current: &Version,
    pool: &VersionPool,
    restriction: &RangeSpec,
    include_snapshots: bool,
    comparator: &dyn VersionComparator,
) -> Option<Version> {
    BoundedVersionSet::new(pool, comparator)
        .newest_in_any(restriction.restrictions(), include_snapshots)
        .filter(|newest| *newest != current)
        .cloned()
}

/// Evaluate a single prepared component
pub async fn evaluate_component(
    provider: &dyn MetadataProvider,
    reactor: &dyn ReactorSource,
    component: &PreparedComponent,
) -> Result<ComponentUpdate, MetadataError> {
    let comparator = component.comparator.comparator();

    let raw = provider.fetch_versions(&component.coordinate).await?;
    let pool = VersionPool::from_strings(&raw, comparator);
    debug!(
        "{}: {} available versions",
        component.coordinate,
        pool.len()
    );

    let summary = summarize(
        component.coordinate.clone(),
        component.current.clone(),
        &pool,
        comparator,
        component.include_snapshots,
    );
    let details = update_details(
        &component.current,
        &pool,
        comparator,
        component.include_snapshots,
    );
    let winner = repository_winner(
        &component.current,
        &pool,
        &component.restriction,
        component.include_snapshots,
        comparator,
    );

    let reactor_pool = if component.reactor.search_reactor {
        VersionPool::from_strings(&reactor.reactor_versions(&component.coordinate), comparator)
    } else {
        VersionPool::default()
    };
    let merge = merge_with_reactor(
        &component.current,
        winner.clone(),
        &reactor_pool,
        &component.restriction,
        component.include_snapshots,
        component.reactor,
        comparator,
    );
    debug!(
        "{}: repository winner {:?}, merge decision {:?}",
        component.coordinate, winner, merge.decision
    );
    let trace = component.explain.then(|| {
        explain_tiers(
            &component.current,
            &pool,
            comparator,
            component.include_snapshots,
        )
    });

    Ok(ComponentUpdate {
        coordinate: component.coordinate.clone(),
        property: component.property.clone(),
        current: component.current.clone(),
        comparator: component.comparator,
        summary,
        details,
        repository_winner: winner,
        merge,
        trace,
    })
}

/// Evaluate one component straight from its configuration
pub async fn evaluate(
    provider: &dyn MetadataProvider,
    reactor: &dyn ReactorSource,
    config: &ComponentConfig,
    global_snapshots: bool,
) -> Result<ComponentUpdate, EvaluationError> {
    let component = PreparedComponent::prepare(config, global_snapshots)?;
    Ok(evaluate_component(provider, reactor, &component).await?)
}

/// Evaluate every configured component
///
/// Configuration errors abort before anything is fetched. Metadata errors
/// are logged and recorded in [`BatchReport::failures`].
pub async fn evaluate_all(
    provider: &dyn MetadataProvider,
    reactor: &dyn ReactorSource,
    config: &UpdatesConfig,
) -> Result<BatchReport, ConfigError> {
    let components = prepare_all(config)?;
    info!("Evaluating {} components", components.len());

    let futures = components.iter().map(|component| async move {
        evaluate_component(provider, reactor, component)
            .await
            .map_err(|e| {
                warn!("Skipping {}: {}", component.coordinate, e);
                ComponentFailure {
                    coordinate: component.coordinate.clone(),
                    reason: e.to_string(),
                }
            })
    });

    let mut report = BatchReport::default();
    for result in join_all(futures).await {
        match result {
            Ok(update) => report.updates.push(update),
            Err(failure) => report.failures.push(failure),
        }
    }

    report.updates.sort_by(compare_updates);
    report
        .failures
        .sort_by(|a, b| a.coordinate.cmp(&b.coordinate));

    info!(
        "Evaluated {} components, {} skipped",
        report.updates.len(),
        report.failures.len()
    );
    Ok(report)
}

fn compare_updates(a: &ComponentUpdate, b: &ComponentUpdate) -> Ordering {
    a.coordinate
        .cmp(&b.coordinate)
        .then_with(|| a.comparator.comparator().compare(&a.current, &b.current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::comparators::MavenComparator;
    use crate::version::provider::{MockMetadataProvider, NoReactor};
    use crate::version::reactor::MergeDecision;
    use serde_json::json;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn strings(versions: &[&str]) -> Vec<String> {
        versions.iter().map(|s| s.to_string()).collect()
    }

    fn config(value: serde_json::Value) -> UpdatesConfig {
        serde_json::from_value(value).unwrap()
    }

    struct FixedReactor(Vec<String>);

    impl ReactorSource for FixedReactor {
        fn reactor_versions(&self, _coordinate: &Coordinate) -> Vec<String> {
            self.0.clone()
        }
    }

    #[test]
    fn repository_winner_is_none_when_newest_is_current() {
        let pool = VersionPool::new([v("1.0"), v("1.1")], &MavenComparator);

        let winner = repository_winner(
            &v("1.1"),
            &pool,
            &RangeSpec::unrestricted(),
            false,
            &MavenComparator,
        );

        assert_eq!(winner, None);
    }

    #[test]
    fn repository_winner_respects_restriction() {
        let pool = VersionPool::new([v("1.0"), v("1.1"), v("2.0")], &MavenComparator);

        let winner = repository_winner(
            &v("1.0"),
            &pool,
            &RangeSpec::parse("[1.0,2.0)").unwrap(),
            false,
            &MavenComparator,
        );

        assert_eq!(winner, Some(v("1.1")));
    }

    #[tokio::test]
    async fn evaluate_component_combines_summary_and_winner() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_versions()
            .withf(|coordinate| coordinate.to_string() == "g:a")
            .times(1)
            .returning(|_| Ok(strings(&["1.0.0", "1.0.1", "1.1.0", "2.0.0-SNAPSHOT"])));

        let component = PreparedComponent::prepare(
            &ComponentConfig::new(Coordinate::new("g", "a"), "1.0.0"),
            false,
        )
        .unwrap();

        let update = evaluate_component(&provider, &NoReactor, &component)
            .await
            .unwrap();

        assert_eq!(update.summary.latest_incremental(), Some(&v("1.0.1")));
        assert_eq!(update.summary.latest_major(), Some(&v("1.1.0")));
        assert_eq!(update.repository_winner, Some(v("1.1.0")));
        assert_eq!(update.recommended(), Some(&v("1.1.0")));
        assert_eq!(update.merge.decision, MergeDecision::NotSearched);
        assert!(update.has_updates(false));
    }

    #[tokio::test]
    async fn evaluate_component_searches_reactor_when_enabled() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_versions()
            .returning(|_| Ok(strings(&["1.0.0", "1.1.0"])));

        let mut config = ComponentConfig::new(Coordinate::new("g", "a"), "1.0.0");
        config.search_reactor = true;
        let component = PreparedComponent::prepare(&config, false).unwrap();
        let reactor = FixedReactor(strings(&["1.2.0"]));

        let update = evaluate_component(&provider, &reactor, &component)
            .await
            .unwrap();

        assert_eq!(update.recommended(), Some(&v("1.2.0")));
        assert_eq!(update.merge.decision, MergeDecision::ReactorNewer);
    }

    #[tokio::test]
    async fn evaluate_reports_config_errors_as_unrecoverable() {
        let provider = MockMetadataProvider::new();
        let mut config = ComponentConfig::new(Coordinate::new("g", "a"), "1.0");
        config.version_range = Some("[1.0".to_string());

        let result = evaluate(&provider, &NoReactor, &config, false).await;

        let error = result.unwrap_err();
        assert!(!error.is_recoverable());
    }

    #[tokio::test]
    async fn evaluate_reports_metadata_errors_as_recoverable() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_versions()
            .returning(|c| Err(MetadataError::NotFound(c.to_string())));

        let result = evaluate(
            &provider,
            &NoReactor,
            &ComponentConfig::new(Coordinate::new("g", "a"), "1.0"),
            false,
        )
        .await;

        let error = result.unwrap_err();
        assert!(error.is_recoverable());
    }

    #[tokio::test]
    async fn evaluate_all_continues_past_metadata_errors() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_versions()
            .withf(|coordinate| coordinate.to_string() == "g:broken")
            .times(1)
            .returning(|_| {
                Err(MetadataError::Unavailable {
                    coordinate: "g:broken".to_string(),
                    reason: "timeout".to_string(),
                })
            });
        provider
            .expect_fetch_versions()
            .withf(|coordinate| coordinate.to_string() == "g:ok")
            .times(1)
            .returning(|_| Ok(strings(&["1.0", "2.0"])));

        let config = config(json!({
            "components": [
                { "coordinate": "g:broken", "version": "1.0" },
                { "coordinate": "g:ok", "version": "1.0" }
            ]
        }));

        let report = evaluate_all(&provider, &NoReactor, &config).await.unwrap();

        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].coordinate, Coordinate::new("g", "ok"));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].coordinate, Coordinate::new("g", "broken"));
    }

    #[tokio::test]
    async fn evaluate_all_aborts_on_invalid_config_before_fetching() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_fetch_versions().times(0);

        let config = config(json!({
            "components": [
                { "coordinate": "g:a", "version": "1.0" },
                { "coordinate": "g:b", "version": "1.0", "versionRange": "(1.0)" }
            ]
        }));

        let result = evaluate_all(&provider, &NoReactor, &config).await;

        assert!(matches!(result, Err(ConfigError::InvalidRange(_))));
    }

    #[tokio::test]
    async fn evaluate_all_skips_excluded_components() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_versions()
            .withf(|coordinate| coordinate.to_string() == "g:kept")
            .times(1)
            .returning(|_| Ok(strings(&["1.0"])));

        let config = config(json!({
            "excludes": ["g:skipped"],
            "components": [
                { "coordinate": "g:skipped", "version": "1.0" },
                { "coordinate": "g:kept", "version": "1.0" }
            ]
        }));

        let report = evaluate_all(&provider, &NoReactor, &config).await.unwrap();

        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].coordinate, Coordinate::new("g", "kept"));
    }

    #[tokio::test]
    async fn evaluate_all_sorts_by_coordinate_then_current() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_versions()
            .returning(|_| Ok(strings(&["1.0", "1.10", "1.9"])));

        let config = config(json!({
            "components": [
                { "coordinate": "org:z", "version": "1.0" },
                { "coordinate": "org:a", "version": "1.10" },
                { "coordinate": "org:a", "version": "1.9" }
            ]
        }));

        let report = evaluate_all(&provider, &NoReactor, &config).await.unwrap();

        let order: Vec<String> = report
            .updates
            .iter()
            .map(|u| format!("{} {}", u.coordinate, u.current))
            .collect();
        assert_eq!(order, vec!["org:a 1.9", "org:a 1.10", "org:z 1.0"]);
    }

    #[tokio::test]
    async fn explain_attaches_tier_traces() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_versions()
            .returning(|_| Ok(strings(&["1.0.0", "1.1.0", "2.0.0"])));

        let quiet = config(json!({
            "components": [{ "coordinate": "g:a", "version": "1.0.0" }]
        }));
        let explained = UpdatesConfig {
            explain: true,
            ..quiet.clone()
        };

        let without = evaluate_all(&provider, &NoReactor, &quiet).await.unwrap();
        let with = evaluate_all(&provider, &NoReactor, &explained).await.unwrap();

        assert_eq!(without.updates[0].trace, None);
        let trace = with.updates[0].trace.as_ref().unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace[2].decisions.len(), 3);

        let json = serde_json::to_value(&with.updates[0]).unwrap();
        assert_eq!(json["trace"][0]["segment"], "incremental");
        assert_eq!(json["trace"][0]["decisions"][1]["verdict"], "aboveUpper");
        assert!(serde_json::to_value(&without.updates[0]).unwrap().get("trace").is_none());
    }

    #[tokio::test]
    async fn snapshot_override_applies_per_component() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_versions()
            .returning(|_| Ok(strings(&["1.0", "1.1-SNAPSHOT"])));

        let config = config(json!({
            "includeSnapshots": true,
            "components": [
                { "coordinate": "g:global", "version": "1.0" },
                { "coordinate": "g:override", "version": "1.0", "includeSnapshots": false }
            ]
        }));

        let report = evaluate_all(&provider, &NoReactor, &config).await.unwrap();

        let global = &report.updates[0];
        let overridden = &report.updates[1];
        assert_eq!(global.coordinate, Coordinate::new("g", "global"));
        assert_eq!(global.recommended(), Some(&v("1.1-SNAPSHOT")));
        assert_eq!(overridden.recommended(), None);
    }
}
