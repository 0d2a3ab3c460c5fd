//! JSON catalog of repository and reactor versions
//!
//! ```json
//! {
//!   "repository": { "org.example:lib": ["1.0.0", "1.1.0"] },
//!   "reactor": { "org.example:lib": ["1.2.0-SNAPSHOT"] }
//! }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info};

use crate::version::error::MetadataError;
use crate::version::provider::{MetadataProvider, ReactorSource};
use crate::version::types::Coordinate;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Catalog {
    pub repository: IndexMap<String, Vec<String>>,
    pub reactor: IndexMap<String, Vec<String>>,
}

/// Metadata provider and reactor source backed by a [`Catalog`]
#[derive(Debug, Clone, Default)]
pub struct CatalogProvider {
    catalog: Catalog,
}

impl CatalogProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        info!("Loading version catalog from {:?}", path);

        let content = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&content)
            .map_err(|e| MetadataError::InvalidResponse(format!("{}: {}", path.display(), e)))?;

        debug!(
            "Catalog has {} repository and {} reactor components",
            catalog.repository.len(),
            catalog.reactor.len()
        );
        Ok(Self::new(catalog))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for CatalogProvider {
    async fn fetch_versions(&self, coordinate: &Coordinate) -> Result<Vec<String>, MetadataError> {
        self.catalog
            .repository
            .get(&coordinate.to_string())
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(coordinate.to_string()))
    }
}

impl ReactorSource for CatalogProvider {
    fn reactor_versions(&self, coordinate: &Coordinate) -> Vec<String> {
        self.catalog
            .reactor
            .get(&coordinate.to_string())
            .cloned()
            .unwrap_or_default()
    }
}
