//! Source configuration.
//!
//! Configuration is a YAML mapping with a `sources` sequence:
//!
//! ```yaml
//! timeout_secs: 10
//! sources:
//!   - name: ReliefWeb Updates
//!     type: rss
//!     url: https://reliefweb.int/updates/rss.xml
//!   - name: Wire API
//!     type: api
//!     url: https://example.org/v2/top-headlines
//!     enabled: false
//! ```
//!
//! It is read once at startup and treated as immutable afterwards.

use crate::error::ConfigError;
use crate::models::SourceKind;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SOURCE_DELAY_SECS: u64 = 1;

fn default_name() -> String {
    "Unknown".to_string()
}

fn default_kind() -> String {
    "rss".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_source_delay_secs() -> u64 {
    DEFAULT_SOURCE_DELAY_SECS
}

/// One configured feed or API endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Raw declared type; see [`SourceConfig::kind`].
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl SourceConfig {
    /// Resolved fetch path, or `None` for an unrecognized type.
    pub fn kind(&self) -> Option<SourceKind> {
        self.kind.parse().ok()
    }

    /// The URL, if present and not blank.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// Everything the fetcher needs for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause after each fetched source.
    #[serde(default = "default_source_delay_secs")]
    pub source_delay_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            source_delay_secs: DEFAULT_SOURCE_DELAY_SECS,
        }
    }
}

impl FetcherConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(sources = config.sources.len(), "Loaded source configuration");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn source_delay(&self) -> Duration {
        Duration::from_secs(self.source_delay_secs)
    }
}
