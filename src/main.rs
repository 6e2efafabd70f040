//! # Crisis Feed Fetcher
//!
//! Fetches short news records from a configured list of RSS feeds and JSON
//! APIs, normalizes each into a common event shape and emits one aggregated
//! list for downstream crisis-monitoring pipelines.
//!
//! ## Usage
//!
//! ```sh
//! crisis_feed_fetcher -c config/sources.yaml -o ./data
//! ```
//!
//! ## Pipeline
//!
//! 1. **Configuration**: Load the ordered source list from YAML
//! 2. **Fetching**: Poll each enabled source in order, pausing between sources
//! 3. **Normalization**: Map every item to `{title, description, url, published, source, type}`
//! 4. **Output**: Write `events.json` (or print it to stdout)
//!
//! A failing source only costs its own events; the run itself fails only on
//! configuration or output errors.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod utils;

use cli::Cli;
use config::FetcherConfig;
use fetcher::Fetcher;
use models::EventsSnapshot;
use outputs::json;
use utils::utc_now_iso;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so a snapshot printed to stdout stays clean JSON.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("crisis_feed_fetcher starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = FetcherConfig::load(&args.config)?;
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    let timeout_secs = config.timeout_secs;
    let source_delay_secs = config.source_delay_secs;

    let fetcher = Fetcher::new(config)?;
    info!(
        sources = fetcher.sources().len(),
        timeout_secs,
        source_delay_secs,
        "Fetcher ready"
    );
    let events = fetcher.fetch_all().await;
    let snapshot = EventsSnapshot::new(utc_now_iso(), events);

    match args.output_dir.as_deref() {
        Some(dir) => {
            json::write_snapshot(&snapshot, dir).await?;
        }
        None => println!("{}", json::render_snapshot(&snapshot)?),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        events = snapshot.total_events,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
