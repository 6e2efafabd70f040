//! Data models for normalized news events.
//!
//! This module defines the records that flow out of the fetcher:
//! - [`SourceKind`]: Which fetch path produced a record (`rss` or `api`)
//! - [`Event`]: One normalized news item, uniform across source formats
//! - [`EventsSnapshot`]: The document written for downstream consumers
//!
//! Field names are serialized in snake_case except for [`Event::kind`], which
//! is exposed as `type` to match what downstream pipelines read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fetch path a source is read through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Syndication feed (RSS 2.0, RSS 1.0/RDF or Atom).
    Rss,
    /// JSON HTTP endpoint returning an `articles` or `items` list.
    Api,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Rss => "rss",
            SourceKind::Api => "api",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rss" => Ok(SourceKind::Rss),
            "api" => Ok(SourceKind::Api),
            other => Err(other.to_string()),
        }
    }
}

/// A single normalized news item.
///
/// Every event carries a non-empty `title`, `description`, `source` and
/// `kind`. The description is plain text: markup is stripped and whitespace
/// collapsed before the event is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Event {
    /// Headline, or `"No title"` when the upstream record has none.
    pub title: String,
    /// Plain-text summary, or `"No description available."`.
    pub description: String,
    /// Link to the original item; may be empty.
    pub url: String,
    /// Publication timestamp as delivered upstream.
    pub published: String,
    /// Name of the configured source this event came from.
    pub source: String,
    /// Fetch path that produced the event.
    #[serde(rename = "type")]
    pub kind: SourceKind,
}

/// The output document of one fetch cycle.
///
/// `last_updated` is an ISO-8601 UTC timestamp taken when the cycle finished.
#[derive(Debug, Deserialize, Serialize)]
pub struct EventsSnapshot {
    pub last_updated: String,
    pub total_events: usize,
    pub events: Vec<Event>,
}

impl EventsSnapshot {
    pub fn new(last_updated: String, events: Vec<Event>) -> Self {
        Self {
            last_updated,
            total_events: events.len(),
            events,
        }
    }
}
