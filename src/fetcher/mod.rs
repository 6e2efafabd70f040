//! The fetcher: polls configured sources and normalizes their items.
//!
//! Each enabled source is read through one of two paths:
//!
//! | Path | Module  | Input                          | Event `type` |
//! |------|---------|--------------------------------|--------------|
//! | RSS  | [`feed`] | RSS 2.0, RSS 1.0/RDF, Atom    | `rss`        |
//! | API  | [`api`]  | JSON with `articles`/`items`  | `api`        |
//!
//! # Failure model
//!
//! A source either yields its events or fails with a [`FetchError`]. The
//! `try_*` methods expose that result; [`Fetcher::fetch_rss`],
//! [`Fetcher::fetch_api`] and [`Fetcher::fetch_all`] log failures and turn
//! them into empty contributions, so a broken source never takes the whole
//! run down.
//!
//! Sources are processed strictly one after another, with a fixed pause after
//! each fetched source.

pub mod api;
pub mod feed;

use crate::config::{FetcherConfig, SourceConfig};
use crate::error::FetchError;
use crate::models::{Event, SourceKind};
use crate::utils::{clean_html, non_empty_or, normalize_date, truncate_for_log, NO_TITLE};
use feed::FeedEntry;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// User-agent sent with every request.
pub const USER_AGENT: &str = "CrisisManagementScraper/1.0";

/// Items kept per source, first-delivered first.
pub const MAX_ITEMS_PER_SOURCE: usize = 20;

/// Fetches and normalizes events from a fixed list of sources.
///
/// One HTTP client is built at construction and reused for every request of
/// the fetcher's lifetime.
#[derive(Debug, Clone)]
pub struct Fetcher {
    sources: Vec<SourceConfig>,
    timeout: Duration,
    source_delay: Duration,
    client: Client,
}

impl Fetcher {
    /// Build a fetcher from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Source list, request timeout and inter-source pause
    ///
    /// # Returns
    ///
    /// A fetcher owning one HTTP client that sends [`USER_AGENT`].
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be constructed (e.g. the TLS
    /// backend fails to initialize).
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            timeout: config.timeout(),
            source_delay: config.source_delay(),
            sources: config.sources,
            client,
        })
    }

    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Fetch and normalize one feed, surfacing failures.
    ///
    /// A malformed feed is not a failure: the problem is logged and whatever
    /// entries were recovered are used.
    ///
    /// # Arguments
    ///
    /// * `url` - Feed URL; relative entry links are resolved against it
    /// * `source_name` - Configured source name, copied into every event
    ///
    /// # Returns
    ///
    /// At most [`MAX_ITEMS_PER_SOURCE`] events of type `rss`, in feed order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for an invalid URL, a transport failure or a
    /// non-2xx status.
    #[instrument(level = "info", skip(self), fields(source = %source_name))]
    pub async fn try_fetch_rss(&self, url: &str, source_name: &str) -> Result<Vec<Event>, FetchError> {
        info!(%url, "Fetching RSS from {source_name}");
        let feed_url = Url::parse(url)?;

        let body = self
            .client
            .get(feed_url.clone())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let parsed = feed::parse_feed(&body, Some(&feed_url));
        if let Some(reason) = &parsed.malformed {
            warn!(
                %reason,
                recovered = parsed.entries.len(),
                "Feed parsing warning for {source_name}"
            );
        }

        let events: Vec<Event> = parsed
            .entries
            .into_iter()
            .take(MAX_ITEMS_PER_SOURCE)
            .map(|entry| entry_to_event(entry, source_name))
            .collect();

        info!(count = events.len(), "Fetched {} events from {source_name}", events.len());
        Ok(events)
    }

    /// Fetch and normalize one JSON API endpoint, surfacing failures.
    ///
    /// # Arguments
    ///
    /// * `url` - Endpoint returning an `articles` or `items` list
    /// * `source_name` - Configured source name, copied into every event
    ///
    /// # Returns
    ///
    /// At most [`MAX_ITEMS_PER_SOURCE`] events of type `api`, in list order.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx statuses satisfy
    /// [`FetchError::is_transport`]; a non-JSON body or a body without an
    /// item list does not.
    #[instrument(level = "info", skip(self), fields(source = %source_name))]
    pub async fn try_fetch_api(&self, url: &str, source_name: &str) -> Result<Vec<Event>, FetchError> {
        info!(%url, "Fetching API from {source_name}");
        let endpoint = Url::parse(url)?;

        let body = self
            .client
            .get(endpoint)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let data: serde_json::Value = serde_json::from_str(&body).inspect_err(|e| {
            debug!(error = %e, body = %truncate_for_log(&body, 300), "API body is not JSON");
        })?;

        let events: Vec<Event> = api::item_list(&data)?
            .iter()
            .take(MAX_ITEMS_PER_SOURCE)
            .filter_map(|item| {
                let event = api::item_to_event(item, source_name);
                if event.is_none() {
                    debug!(item = %truncate_for_log(&item.to_string(), 120), "Skipping non-object API item");
                }
                event
            })
            .collect();

        info!(count = events.len(), "Fetched {} events from {source_name}", events.len());
        Ok(events)
    }

    /// RSS path: events from one feed, or an empty list on any failure.
    pub async fn fetch_rss(&self, url: &str, source_name: &str) -> Vec<Event> {
        match self.try_fetch_rss(url, source_name).await {
            Ok(events) => events,
            Err(e) => {
                error!(source = %source_name, error = %e, "Error fetching RSS from {source_name}");
                Vec::new()
            }
        }
    }

    /// API path: events from one endpoint, or an empty list on any failure.
    pub async fn fetch_api(&self, url: &str, source_name: &str) -> Vec<Event> {
        match self.try_fetch_api(url, source_name).await {
            Ok(events) => events,
            Err(e) if e.is_transport() => {
                error!(source = %source_name, error = %e, "Error fetching API from {source_name}");
                Vec::new()
            }
            Err(e) => {
                error!(source = %source_name, error = %e, "Unexpected error with {source_name}");
                Vec::new()
            }
        }
    }

    /// Events for one configured source, or `None` when the source is skipped.
    ///
    /// Skipped sources (disabled, no URL, unknown type) never touch the network.
    pub async fn fetch_source(&self, source: &SourceConfig) -> Option<Vec<Event>> {
        if !source.enabled {
            info!(source = %source.name, "Skipping disabled source");
            return None;
        }

        let Some(url) = source.url() else {
            warn!(source = %source.name, "No URL for source");
            return None;
        };

        match source.kind() {
            Some(kind) => {
                debug!(source = %source.name, %kind, "Dispatching source");
                let events = match kind {
                    SourceKind::Rss => self.fetch_rss(url, &source.name).await,
                    SourceKind::Api => self.fetch_api(url, &source.name).await,
                };
                Some(events)
            }
            None => {
                warn!(
                    source = %source.name,
                    kind = %source.kind,
                    "Unknown source type '{}' for {}",
                    source.kind,
                    source.name
                );
                None
            }
        }
    }

    /// Fetch every configured source in declaration order.
    ///
    /// # Returns
    ///
    /// The concatenation of each source's events in source order, then
    /// per-source delivery order. Never fails; broken sources contribute
    /// nothing.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len()))]
    pub async fn fetch_all(&self) -> Vec<Event> {
        let mut all_events = Vec::new();

        for source in &self.sources {
            let Some(events) = self.fetch_source(source).await else {
                continue;
            };
            all_events.extend(events);

            // Be polite to remote hosts.
            if !self.source_delay.is_zero() {
                sleep(self.source_delay).await;
            }
        }

        info!(count = all_events.len(), "Fetched events from all sources");
        all_events
    }
}

/// Normalize one feed entry.
///
/// Description prefers the entry summary, then its description, then its
/// full content; the date prefers `published` over `updated` and falls back
/// to the current time.
fn entry_to_event(entry: FeedEntry, source_name: &str) -> Event {
    let description = entry.summary.or(entry.description).or(entry.content);
    let published = entry.published.or(entry.updated);

    Event {
        title: non_empty_or(entry.title.as_deref(), NO_TITLE),
        description: clean_html(description.as_deref()),
        url: entry.link.unwrap_or_default(),
        published: normalize_date(published.as_deref()),
        source: source_name.to_string(),
        kind: SourceKind::Rss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::NO_DESCRIPTION;
    use chrono::DateTime;
    use mockito::Server;
    use serde_json::json;
    use std::time::Instant;
    use tracing_test::traced_test;

    fn rss_with_items(n: usize) -> String {
        let items: String = (0..n)
            .map(|i| {
                format!(
                    "<item><title>Item {i}</title><link>https://news.example.org/{i}</link>\
                     <description>&lt;p&gt;Body {i}&lt;/p&gt;</description>\
                     <pubDate>Tue, 06 May 2025 10:{:02}:00 GMT</pubDate></item>",
                    i % 60
                )
            })
            .collect();
        format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title>{items}</channel></rss>"#)
    }

    fn source(name: &str, kind: &str, url: Option<String>) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            kind: kind.to_string(),
            url,
            enabled: true,
        }
    }

    fn fetcher(sources: Vec<SourceConfig>) -> Fetcher {
        Fetcher::new(FetcherConfig {
            sources,
            timeout_secs: 5,
            source_delay_secs: 0,
        })
        .unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_single_rss_source_returns_all_entries() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/feed.xml")
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body(rss_with_items(3))
            .create_async()
            .await;

        let f = fetcher(vec![source("Relief", "rss", Some(format!("{}/feed.xml", server.url())))]);
        let events = f.fetch_all().await;

        mock.assert_async().await;
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.kind == SourceKind::Rss));
        assert!(events.iter().all(|e| e.source == "Relief"));
        assert_eq!(events[0].title, "Item 0");
        assert_eq!(events[0].description, "Body 0");
        assert_eq!(events[0].url, "https://news.example.org/0");
        assert_eq!(events[0].published, "Tue, 06 May 2025 10:00:00 GMT");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_api_source_normalizes_article() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/news")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"articles": [{"title": "T", "description": "<b>d</b>", "url": "http://x"}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let f = fetcher(vec![source("Wire", "api", Some(format!("{}/v2/news", server.url())))]);
        let events = f.fetch_all().await;

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.title, "T");
        assert_eq!(event.description, "d");
        assert_eq!(event.url, "http://x");
        assert_eq!(event.published, "");
        assert_eq!(event.kind, SourceKind::Api);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_disabled_source_is_skipped() {
        let mut server = Server::new_async().await;
        let disabled_mock = server
            .mock("GET", "/disabled.xml")
            .expect(0)
            .create_async()
            .await;
        let _live = server
            .mock("GET", "/live.xml")
            .with_status(200)
            .with_body(rss_with_items(1))
            .create_async()
            .await;

        let mut disabled = source("Old", "rss", Some(format!("{}/disabled.xml", server.url())));
        disabled.enabled = false;
        let live = source("Live", "rss", Some(format!("{}/live.xml", server.url())));

        let events = fetcher(vec![disabled, live]).fetch_all().await;

        disabled_mock.assert_async().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, "Live");
        assert!(logs_contain("Skipping disabled source"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_api_server_error_yields_no_events() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;

        let f = fetcher(vec![source("Broken", "api", Some(format!("{}/broken", server.url())))]);
        assert!(f.fetch_api(&format!("{}/broken", server.url()), "Broken").await.is_empty());
        assert!(f.fetch_all().await.is_empty());
        assert!(logs_contain("Error fetching API from Broken"));

        let err = f
            .try_fetch_api(&format!("{}/broken", server.url()), "Broken")
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_no_sources_yields_empty_list() {
        assert!(fetcher(Vec::new()).fetch_all().await.is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_missing_url_and_unknown_type_are_skipped() {
        let mut server = Server::new_async().await;
        let untouched = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let events = fetcher(vec![
            source("NoUrl", "rss", None),
            source("Scraper", "html", Some(format!("{}/page", server.url()))),
        ])
        .fetch_all()
        .await;

        untouched.assert_async().await;
        assert!(events.is_empty());
        assert!(logs_contain("No URL for source"));
        assert!(logs_contain("Unknown source type 'html' for Scraper"));
    }

    #[tokio::test]
    async fn test_rss_keeps_first_twenty_entries() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/big.xml")
            .with_status(200)
            .with_body(rss_with_items(25))
            .create_async()
            .await;

        let f = fetcher(Vec::new());
        let events = f.fetch_rss(&format!("{}/big.xml", server.url()), "Big").await;

        assert_eq!(events.len(), MAX_ITEMS_PER_SOURCE);
        let titles: Vec<String> = (0..20).map(|i| format!("Item {i}")).collect();
        assert_eq!(events.iter().map(|e| e.title.clone()).collect::<Vec<_>>(), titles);
    }

    #[tokio::test]
    async fn test_api_keeps_first_twenty_items() {
        let mut server = Server::new_async().await;
        let items: Vec<_> = (0..30)
            .map(|i| json!({"title": format!("A{i}"), "link": format!("http://x/{i}"), "pubDate": "2025-05-06"}))
            .collect();
        let _mock = server
            .mock("GET", "/items")
            .with_status(200)
            .with_body(json!({ "items": items }).to_string())
            .create_async()
            .await;

        let f = fetcher(Vec::new());
        let events = f.fetch_api(&format!("{}/items", server.url()), "Items").await;

        assert_eq!(events.len(), 20);
        assert_eq!(events[0].title, "A0");
        assert_eq!(events[19].title, "A19");
        assert_eq!(events[19].url, "http://x/19");
        assert_eq!(events[19].published, "2025-05-06");
    }

    #[tokio::test]
    async fn test_rss_entry_without_dates_gets_utc_timestamp() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/nodate.xml")
            .with_status(200)
            .with_body(r#"<rss version="2.0"><channel><item><title></title></item></channel></rss>"#)
            .create_async()
            .await;

        let f = fetcher(Vec::new());
        let events = f.fetch_rss(&format!("{}/nodate.xml", server.url()), "NoDate").await;

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.title, NO_TITLE);
        assert_eq!(event.description, NO_DESCRIPTION);
        assert_eq!(event.url, "");
        assert!(event.published.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&event.published).is_ok());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_malformed_feed_warns_and_keeps_recovered_entries() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/bozo.xml")
            .with_status(200)
            .with_body(
                r#"<rss version="2.0"><channel><item><title>Storm&nbsp;surge</title></item></channel></rss>"#,
            )
            .create_async()
            .await;

        let f = fetcher(Vec::new());
        let events = f.fetch_rss(&format!("{}/bozo.xml", server.url()), "Bozo").await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Storm surge");
        assert!(logs_contain("Feed parsing warning for Bozo"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_namespace_heavy_rss_feed_end_to_end() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:atom="http://www.w3.org/2005/Atom"
     xmlns:media="http://search.yahoo.com/mrss/"
     xmlns:dc="http://purl.org/dc/elements/1.1/"
     xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Crisis Wire</title>
    <atom:link href="https://wire.example.org/rss" rel="self" type="application/rss+xml"/>
    <item>
      <title>Wildfire evacuations expand</title>
      <media:title type="plain">Smoke over the ridge</media:title>
      <link>https://wire.example.org/wildfire</link>
      <atom:link href="https://wire.example.org/wildfire/amp" rel="amphtml"/>
      <dc:creator>Field desk</dc:creator>
      <dc:date>2025-05-06T06:15:00Z</dc:date>
      <media:content url="https://cdn.example.org/fire.jpg" medium="image"/>
      <content:encoded><![CDATA[<p>Full <em>story</em> text</p>]]></content:encoded>
    </item>
    <item>
      <title>Shelter capacity update</title>
      <link>https://wire.example.org/shelters</link>
      <description>&lt;p&gt;Three shelters &lt;b&gt;open&lt;/b&gt;&lt;/p&gt;</description>
      <pubDate>Tue, 06 May 2025 09:00:00 GMT</pubDate>
      <dc:date>2025-05-06T08:59:00Z</dc:date>
    </item>
  </channel>
</rss>"#;
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/wire.xml")
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body(body)
            .create_async()
            .await;

        let f = fetcher(vec![source("Wire", "rss", Some(format!("{}/wire.xml", server.url())))]);
        let events = f.fetch_all().await;

        assert_eq!(events.len(), 2);
        assert!(!logs_contain("Feed parsing warning for Wire"));

        let fire = &events[0];
        assert_eq!(fire.title, "Wildfire evacuations expand");
        assert_eq!(fire.url, "https://wire.example.org/wildfire");
        assert_eq!(fire.description, "Full story text");
        assert_eq!(fire.published, "2025-05-06T06:15:00Z");

        let shelters = &events[1];
        assert_eq!(shelters.description, "Three shelters open");
        assert_eq!(shelters.published, "Tue, 06 May 2025 09:00:00 GMT");
    }

    #[tokio::test]
    async fn test_atom_summary_wins_over_content() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Alerts</title>
  <entry>
    <title>Dam release scheduled</title>
    <link href="/alerts/dam"/>
    <summary>Short notice</summary>
    <content type="html">&lt;p&gt;Long body&lt;/p&gt;</content>
    <updated>2025-05-06T12:00:00Z</updated>
  </entry>
  <entry>
    <title>Road closures</title>
    <link href="/alerts/roads"/>
    <content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>Route <b>9</b> closed</p></div></content>
  </entry>
</feed>"#;
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/alerts.atom")
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(body)
            .create_async()
            .await;

        let f = fetcher(Vec::new());
        let events = f.fetch_rss(&format!("{}/alerts.atom", server.url()), "Alerts").await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].description, "Short notice");
        assert_eq!(events[0].url, format!("{}/alerts/dam", server.url()));
        assert_eq!(events[0].published, "2025-05-06T12:00:00Z");
        assert_eq!(events[1].description, "Route 9 closed");
    }

    #[test]
    fn test_entry_to_event_fallback_order() {
        let entry = FeedEntry {
            description: Some("desc".into()),
            content: Some("content".into()),
            updated: Some("2025-05-06".into()),
            ..Default::default()
        };
        let event = entry_to_event(entry, "S");
        assert_eq!(event.description, "desc");
        assert_eq!(event.published, "2025-05-06");

        let content_only = FeedEntry {
            content: Some("<p>only content</p>".into()),
            ..Default::default()
        };
        assert_eq!(entry_to_event(content_only, "S").description, "only content");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_dispatch_logs_source_kind() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/k")
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        fetcher(vec![source("Kinds", "API", Some(format!("{}/k", server.url())))])
            .fetch_all()
            .await;
        assert!(logs_contain("Dispatching source"));
        assert!(logs_contain("kind=api"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_rss_http_failure_is_contained() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.xml")
            .with_status(404)
            .create_async()
            .await;

        let f = fetcher(Vec::new());
        assert!(f.fetch_rss(&format!("{}/gone.xml", server.url()), "Gone").await.is_empty());
        assert!(f.fetch_rss("not a url", "Garbage").await.is_empty());
        assert!(logs_contain("Error fetching RSS from Gone"));
        assert!(logs_contain("Error fetching RSS from Garbage"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_api_non_json_body_is_unexpected_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/html")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let f = fetcher(Vec::new());
        let url = format!("{}/html", server.url());
        assert!(f.fetch_api(&url, "Flaky").await.is_empty());
        assert!(logs_contain("Unexpected error with Flaky"));
        assert!(matches!(
            f.try_fetch_api(&url, "Flaky").await,
            Err(FetchError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_user_agent_is_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ua")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_body(r#"{"articles": []}"#)
            .create_async()
            .await;

        let f = fetcher(Vec::new());
        assert!(f.try_fetch_api(&format!("{}/ua", server.url()), "UA").await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sources_are_concatenated_in_declaration_order() {
        let mut server = Server::new_async().await;
        let _rss = server
            .mock("GET", "/a.xml")
            .with_status(200)
            .with_body(rss_with_items(2))
            .create_async()
            .await;
        let _api = server
            .mock("GET", "/b")
            .with_status(200)
            .with_body(json!({"articles": [{"title": "B0"}]}).to_string())
            .create_async()
            .await;

        let events = fetcher(vec![
            source("B", "API", Some(format!("{}/b", server.url()))),
            source("A", "Rss", Some(format!("{}/a.xml", server.url()))),
        ])
        .fetch_all()
        .await;

        let order: Vec<(&str, &str)> = events
            .iter()
            .map(|e| (e.source.as_str(), e.title.as_str()))
            .collect();
        assert_eq!(order, vec![("B", "B0"), ("A", "Item 0"), ("A", "Item 1")]);
    }

    #[tokio::test]
    async fn test_pause_only_follows_fetched_sources() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/one")
            .with_status(200)
            .with_body(r#"{"articles": []}"#)
            .create_async()
            .await;

        let mut skipped = source("Off", "rss", Some(format!("{}/one", server.url())));
        skipped.enabled = false;
        let config = FetcherConfig {
            sources: vec![skipped.clone()],
            timeout_secs: 5,
            source_delay_secs: 1,
        };
        let started = Instant::now();
        Fetcher::new(config).unwrap().fetch_all().await;
        assert!(started.elapsed() < Duration::from_millis(900));

        let config = FetcherConfig {
            sources: vec![skipped, source("On", "api", Some(format!("{}/one", server.url())))],
            timeout_secs: 5,
            source_delay_secs: 1,
        };
        let started = Instant::now();
        Fetcher::new(config).unwrap().fetch_all().await;
        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}
