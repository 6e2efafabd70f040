//! Normalization helpers shared by the RSS and API paths.
//!
//! - HTML-to-text cleaning for descriptions
//! - Date fallback for feed entries
//! - Title and field fallbacks
//! - Log-friendly truncation of upstream payloads

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

/// Placeholder used when an item has no usable description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Placeholder used when an item has no usable title.
pub const NO_TITLE: &str = "No title";

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Strip HTML markup and collapse whitespace.
///
/// The input is parsed as an HTML fragment, its text nodes are joined with
/// single spaces, every whitespace run is collapsed to one space and the
/// result is trimmed. Absent, empty or markup-only input yields
/// [`NO_DESCRIPTION`], so the return value is never empty.
///
/// # Arguments
///
/// * `text` - Raw description, possibly containing markup and entities
///
/// # Returns
///
/// Plain text with single spaces, or the placeholder.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_html(Some("<p>Flood <b>warning</b></p>")), "Flood warning");
/// assert_eq!(clean_html(None), "No description available.");
/// ```
pub fn clean_html(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return NO_DESCRIPTION.to_string();
    };

    let fragment = Html::parse_fragment(text);
    let joined = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    let cleaned = RE_WS.replace_all(&joined, " ").trim().to_string();

    if cleaned.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        cleaned
    }
}

/// Current UTC time as ISO-8601 with microseconds and a trailing `Z`.
pub fn utc_now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Feed entry date: passed through verbatim, or the current UTC time when empty.
///
/// No parsing happens here; the value is whatever the feed delivered.
///
/// # Arguments
///
/// * `raw` - The entry's `published` or `updated` text, if any
///
/// # Returns
///
/// The trimmed date, or [`utc_now_iso`] when it is absent or blank.
pub fn normalize_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => date.to_string(),
        None => utc_now_iso(),
    }
}

/// `value` unless it is absent or blank, else `default`.
pub fn non_empty_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => default.to_string(),
    }
}

/// Truncate a string for logging, keeping char boundaries intact.
///
/// Long strings keep their first `max` characters followed by
/// `"…(+N bytes)"`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_clean_html_strips_tags_and_collapses_whitespace() {
        let out = clean_html(Some(
            "<div>\n  <p>Flood   <b>warning</b></p>\t<p>issued&nbsp;today</p></div>",
        ));
        assert_eq!(out, "Flood warning issued today");
        let tag = Regex::new(r"<[^>]+>").unwrap();
        assert!(!tag.is_match(&out));
    }

    #[test]
    fn test_clean_html_placeholder_for_empty_input() {
        assert_eq!(clean_html(None), NO_DESCRIPTION);
        assert_eq!(clean_html(Some("")), NO_DESCRIPTION);
        assert_eq!(clean_html(Some("<br/><img src=\"x.png\">")), NO_DESCRIPTION);
        assert_eq!(clean_html(Some("   \n ")), NO_DESCRIPTION);
    }

    #[test]
    fn test_clean_html_plain_text_and_entities() {
        assert_eq!(clean_html(Some("  plain   text ")), "plain text");
        assert_eq!(clean_html(Some("Q&amp;A &lt;live&gt;")), "Q&A <live>");
    }

    #[test]
    fn test_clean_html_simple_bold() {
        assert_eq!(clean_html(Some("<b>d</b>")), "d");
    }

    #[test]
    fn test_utc_now_iso_is_valid_rfc3339_with_z() {
        let ts = utc_now_iso();
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok(), "not ISO-8601: {ts}");
    }

    #[test]
    fn test_normalize_date_passthrough_and_fallback() {
        let raw = "Mon, 06 May 2025 10:00:00 GMT";
        assert_eq!(normalize_date(Some(raw)), raw);
        assert!(normalize_date(None).ends_with('Z'));
        assert!(normalize_date(Some("  ")).ends_with('Z'));
    }

    #[test]
    fn test_non_empty_or() {
        assert_eq!(non_empty_or(Some(" Quake "), NO_TITLE), "Quake");
        assert_eq!(non_empty_or(Some(""), NO_TITLE), NO_TITLE);
        assert_eq!(non_empty_or(None, NO_TITLE), NO_TITLE);
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 100), "short");
        let long = "a".repeat(500);
        let out = truncate_for_log(&long, 100);
        assert!(out.starts_with(&"a".repeat(100)));
        assert!(out.ends_with("…(+400 bytes)"));
        // multi-byte chars are never split
        assert_eq!(truncate_for_log("ééé", 1), "é…(+4 bytes)");
    }
}
