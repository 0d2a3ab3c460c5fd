//! Sources of known versions for a component

#[cfg(test)]
use mockall::automock;

use crate::version::error::MetadataError;
use crate::version::types::Coordinate;

/// Trait for fetching the published versions of a component
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetches all published versions of a component
    ///
    /// # Arguments
    /// * `coordinate` - The component to look up (e.g., "org.example:lib")
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Raw version strings in any order
    /// * `Err(MetadataError)` - If the metadata cannot be retrieved
    async fn fetch_versions(&self, coordinate: &Coordinate) -> Result<Vec<String>, MetadataError>;
}

/// Trait for the versions produced by the current local build
pub trait ReactorSource: Send + Sync {
    /// Versions of the component built in this session, empty when the
    /// component is not part of the reactor
    fn reactor_versions(&self, coordinate: &Coordinate) -> Vec<String>;
}

/// Reactor source for builds without a reactor
pub struct NoReactor;

impl ReactorSource for NoReactor {
    fn reactor_versions(&self, _coordinate: &Coordinate) -> Vec<String> {
        Vec::new()
    }
}
