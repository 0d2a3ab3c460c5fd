use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::version::bounds::VersionRange;
use crate::version::comparator::ComparatorKind;
use crate::version::error::{RangeError, VersionError};
use crate::version::reactor::ReactorPolicy;
use crate::version::restriction::RangeSpec;
use crate::version::types::{Coordinate, Version};

/// Configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid current version for {coordinate}: {source}")]
    InvalidVersion {
        coordinate: Coordinate,
        source: VersionError,
    },

    #[error(transparent)]
    InvalidRange(#[from] RangeError),
}

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatesConfig {
    /// Global snapshot policy, overridable per component
    pub include_snapshots: bool,
    /// Report every component, updated or not
    pub show_all: bool,
    /// `group:artifact` coordinates to skip
    pub excludes: Vec<String>,
    /// Attach per-tier decision traces to every result
    pub explain: bool,
    pub components: Vec<ComponentConfig>,
}

/// One tracked component
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    pub coordinate: Coordinate,
    /// Currently declared version
    pub version: String,
    /// Name of the build property holding the version, if any
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub comparator: ComparatorKind,
    #[serde(default)]
    pub include_snapshots: Option<bool>,
    #[serde(default)]
    pub lower_bound: Option<String>,
    #[serde(default)]
    pub upper_bound: Option<String>,
    #[serde(default = "default_include_lower")]
    pub include_lower: bool,
    #[serde(default)]
    pub include_upper: bool,
    /// Bracket-notation range such as `[1.0,2.0)`
    #[serde(default)]
    pub version_range: Option<String>,
    #[serde(default)]
    pub search_reactor: bool,
    #[serde(default)]
    pub prefer_reactor: bool,
}

fn default_include_lower() -> bool {
    true
}

impl ComponentConfig {
    pub fn new(coordinate: Coordinate, version: &str) -> Self {
        Self {
            coordinate,
            version: version.to_string(),
            property: None,
            comparator: ComparatorKind::default(),
            include_snapshots: None,
            lower_bound: None,
            upper_bound: None,
            include_lower: default_include_lower(),
            include_upper: false,
            version_range: None,
            search_reactor: false,
            prefer_reactor: false,
        }
    }

    pub fn current_version(&self) -> Result<Version, ConfigError> {
        Version::parse(&self.version).map_err(|source| ConfigError::InvalidVersion {
            coordinate: self.coordinate.clone(),
            source,
        })
    }

    /// The restriction applied when picking a single recommended version
    ///
    /// Either `versionRange` or the explicit bounds, never both. Without
    /// either, every version is allowed.
    pub fn restriction(&self) -> Result<RangeSpec, RangeError> {
        let has_bounds = self.lower_bound.is_some() || self.upper_bound.is_some();

        if let Some(spec) = &self.version_range {
            if has_bounds {
                return Err(RangeError::ConflictingRestriction(
                    self.coordinate.to_string(),
                ));
            }
            return RangeSpec::parse(spec);
        }

        let lower = self.lower_bound.as_deref().map(parse_bound).transpose()?;
        let upper = self.upper_bound.as_deref().map(parse_bound).transpose()?;
        Ok(RangeSpec::from_range(VersionRange::between(
            lower,
            upper,
            self.include_lower,
            self.include_upper,
        )))
    }

    /// Component override, else the global default
    pub fn effective_include_snapshots(&self, global: bool) -> bool {
        self.include_snapshots.unwrap_or(global)
    }

    pub fn reactor_policy(&self) -> ReactorPolicy {
        ReactorPolicy {
            search_reactor: self.search_reactor,
            prefer_reactor: self.prefer_reactor,
        }
    }
}

fn parse_bound(value: &str) -> Result<Version, RangeError> {
    Version::parse(value).map_err(|_| RangeError::InvalidBound(value.to_string()))
}

impl UpdatesConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading config from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn is_excluded(&self, coordinate: &Coordinate) -> bool {
        let candidate = coordinate.to_string();
        self.excludes.iter().any(|e| e.trim() == candidate)
    }
}

/// Returns the path to the config directory for version-updates.
/// Uses $XDG_CONFIG_HOME/version-updates if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/version-updates,
/// or ./version-updates if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("version-updates")
}
