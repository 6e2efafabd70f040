//! JSON API response mapping.
//!
//! API sources return an object holding the item list under `articles`
//! (NewsAPI style) or `items`. Each logical attribute is looked up through an
//! ordered list of candidate keys; the first key that is present wins.

use crate::error::FetchError;
use crate::models::{Event, SourceKind};
use crate::utils::{clean_html, non_empty_or, NO_TITLE};
use serde_json::{Map, Value};

pub const LIST_KEYS: &[&str] = &["articles", "items"];
pub const TITLE_KEYS: &[&str] = &["title"];
pub const DESCRIPTION_KEYS: &[&str] = &["description", "content"];
pub const URL_KEYS: &[&str] = &["url", "link"];
pub const PUBLISHED_KEYS: &[&str] = &["publishedAt", "pubDate"];

/// Value of the first candidate key that is present and not `null`.
///
/// Strings are returned as-is (even when empty, since the key *is* present);
/// numbers and booleans are rendered as text. Anything else, or no match,
/// yields `default`.
///
/// # Arguments
///
/// * `record` - One API item
/// * `candidates` - Keys to try, in priority order
/// * `default` - Value used when no candidate is present
///
/// # Returns
///
/// The chosen value as text.
pub fn first_present(record: &Map<String, Value>, candidates: &[&str], default: &str) -> String {
    candidates
        .iter()
        .find_map(|key| match record.get(*key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        })
        .and_then(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| default.to_string())
}

/// The item list of an API body, in delivered order.
///
/// # Arguments
///
/// * `body` - Parsed response body
///
/// # Returns
///
/// The array under the first present key of [`LIST_KEYS`], or an empty
/// slice when none is present.
///
/// # Errors
///
/// [`FetchError::UnexpectedShape`] when the body is not an object, or the
/// list key holds something other than an array.
pub fn item_list(body: &Value) -> Result<&[Value], FetchError> {
    let Value::Object(map) = body else {
        return Err(FetchError::UnexpectedShape(format!(
            "expected a JSON object, got {}",
            json_kind(body)
        )));
    };

    let list = LIST_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()));

    match list {
        None => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(FetchError::UnexpectedShape(format!(
            "item list is {}, not an array",
            json_kind(other)
        ))),
    }
}

/// Map one API item into an [`Event`]. Non-object items yield `None`.
pub fn item_to_event(item: &Value, source_name: &str) -> Option<Event> {
    let record = item.as_object()?;

    let title = first_present(record, TITLE_KEYS, NO_TITLE);
    let description = first_present(record, DESCRIPTION_KEYS, "");

    Some(Event {
        title: non_empty_or(Some(&title), NO_TITLE),
        description: clean_html(Some(&description)),
        url: first_present(record, URL_KEYS, "").trim().to_string(),
        published: first_present(record, PUBLISHED_KEYS, ""),
        source: source_name.to_string(),
        kind: SourceKind::Api,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
