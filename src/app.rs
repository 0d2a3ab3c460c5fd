//! Command execution shared by the binary and integration tests

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::config::{self, UpdatesConfig};
use crate::report::{self, OutputFormat, ReportMode};
use crate::version::evaluator::evaluate_all;
use crate::version::provider::{MetadataProvider, ReactorSource};
use crate::version::providers::CatalogProvider;

/// Catalog file name inside the config directory
pub const CATALOG_FILE_NAME: &str = "catalog.json";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub mode: ReportMode,
    pub format: OutputFormat,
    /// Forces `showAll` on
    pub show_all: bool,
    /// Forces `includeSnapshots` on
    pub allow_snapshots: bool,
    /// Forces `explain` on
    pub explain: bool,
}

/// Load config and catalog from disk, evaluate, and render the output
pub async fn run(options: &RunOptions) -> anyhow::Result<String> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(config::config_path);
    let catalog_path = options
        .catalog_path
        .clone()
        .unwrap_or_else(|| config::config_dir().join(CATALOG_FILE_NAME));

    let mut config = UpdatesConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    config.show_all |= options.show_all;
    config.include_snapshots |= options.allow_snapshots;
    config.explain |= options.explain;

    let catalog = CatalogProvider::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;

    run_with(&catalog, &catalog, &config, options.mode, options.format).await
}

pub async fn run_with(
    provider: &dyn MetadataProvider,
    reactor: &dyn ReactorSource,
    config: &UpdatesConfig,
    mode: ReportMode,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let batch = evaluate_all(provider, reactor, config)
        .await
        .context("Invalid configuration")?;
    info!("Rendering {:?} output as {:?}", mode, format);

    Ok(report::render(&batch, mode, format, config.show_all)?)
}
