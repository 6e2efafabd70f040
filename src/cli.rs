//! Command-line interface definitions.
//!
//! Arguments can be given as flags or, where noted, environment variables.

use clap::Parser;

/// Fetch news from configured RSS feeds and JSON APIs as one normalized event list.
///
/// # Examples
///
/// ```sh
/// # Print the snapshot to stdout
/// crisis_feed_fetcher -c config/sources.yaml
///
/// # Write data/events.json with a 5 second request timeout
/// crisis_feed_fetcher -c config/sources.yaml -o data --timeout 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML source configuration
    #[arg(short, long, env = "FEED_CONFIG", default_value = "config/sources.yaml")]
    pub config: String,

    /// Directory to write events.json into; prints to stdout when omitted
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Request timeout in seconds, overriding the configuration file
    #[arg(long)]
    pub timeout: Option<u64>,
}
