//! Provider test utilities

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use version_updates::config::UpdatesConfig;
use version_updates::version::error::MetadataError;
use version_updates::version::provider::{MetadataProvider, ReactorSource};
use version_updates::version::types::Coordinate;

/// Mock metadata provider and reactor for testing
#[derive(Default)]
pub struct MockProvider {
    versions: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    reactor: HashMap<String, Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, coordinate: &str, versions: Vec<&str>) -> Self {
        self.versions.insert(
            coordinate.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_failure(mut self, coordinate: &str, reason: &str) -> Self {
        self.failures
            .insert(coordinate.to_string(), reason.to_string());
        self
    }

    pub fn with_reactor(mut self, coordinate: &str, versions: Vec<&str>) -> Self {
        self.reactor.insert(
            coordinate.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Coordinates fetched so far, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MetadataProvider for MockProvider {
    async fn fetch_versions(&self, coordinate: &Coordinate) -> Result<Vec<String>, MetadataError> {
        let key = coordinate.to_string();
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(key.clone());
        }

        if let Some(reason) = self.failures.get(&key) {
            return Err(MetadataError::Unavailable {
                coordinate: key,
                reason: reason.clone(),
            });
        }
        match self.versions.get(&key) {
            Some(versions) => Ok(versions.clone()),
            None => Err(MetadataError::NotFound(key)),
        }
    }
}

impl ReactorSource for MockProvider {
    fn reactor_versions(&self, coordinate: &Coordinate) -> Vec<String> {
        self.reactor
            .get(&coordinate.to_string())
            .cloned()
            .unwrap_or_default()
    }
}

/// Build a config from a JSON value
pub fn config_from_json(value: serde_json::Value) -> UpdatesConfig {
    serde_json::from_value(value).unwrap()
}
