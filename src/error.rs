//! Error types for configuration loading and per-source fetching.
//!
//! [`FetchError`] is the failure marker of a single source fetch. The
//! aggregate fetch never returns it: failures are logged and the source
//! contributes no events.

use thiserror::Error;

/// Why a single source produced no events.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Timeout, connection failure or non-2xx status.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid source url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The body parsed but does not have the expected structure.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl FetchError {
    /// Transport failures are logged differently from everything else.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Http(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
