//! Turning free model text into a [`FortuneRecord`].
//!
//! Extraction is a best-effort heuristic: it takes everything from the first
//! `{` to the last `}` and does not attempt to pick between several JSON-like
//! fragments.
//!
//! Replies are parsed with `serde_json`, which rejects lone UTF-16 surrogate
//! escapes such as `"\ud800"`. Such a reply gets the fallback record, where a
//! JavaScript `JSON.parse` would have accepted it.

use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::prelude::*;

/// Returns the slice from the first `{` to the last `}` after it, or the whole
/// text when there is no such span.
pub fn extract_json(text: &str) -> &str {
    let Some(start) = text.find('{') else {
        return text;
    };
    match text.rfind('}') {
        Some(end) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Parses a model reply into a complete record.
///
/// A reply that parses as JSON gets per-field defaults for anything missing or
/// empty. A reply that does not parse at all yields [`FortuneRecord::fallback`].
///
pub fn parse_fortune(text: &str) -> FortuneRecord {
    let candidate = extract_json(text);

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(fields)) => normalize(&fields),
        Ok(Value::Null) => {
            warn!("fortune reply parsed as null, using fallback fortune");
            FortuneRecord::fallback()
        }
        // valid JSON that is not an object has none of the fields
        Ok(_) => normalize(&Map::new()),
        Err(e) => {
            warn!("error parsing fortune JSON: {e}");
            FortuneRecord::fallback()
        }
    }
}

/// Builds a record from parsed fields, filling gaps with per-field defaults.
pub fn normalize(fields: &Map<String, Value>) -> FortuneRecord {
    let field = |name: &str, default: &str| {
        fields
            .get(name)
            .and_then(truthy_text)
            .unwrap_or_else(|| default.to_string())
    };

    FortuneRecord {
        message: field("message", FortuneRecord::DEFAULT_MESSAGE),
        interpretation: field("interpretation", FortuneRecord::DEFAULT_INTERPRETATION),
        lucky_numbers: field("luckyNumbers", FortuneRecord::DEFAULT_LUCKY_NUMBERS),
        lucky_color: field("luckyColor", FortuneRecord::DEFAULT_LUCKY_COLOR),
        lucky_element: field("luckyElement", FortuneRecord::DEFAULT_LUCKY_ELEMENT),
        timeframe: field("timeframe", FortuneRecord::DEFAULT_TIMEFRAME),
    }
}

/// Renders a truthy JSON value as display text, `None` for falsy values.
///
/// Arrays of scalars are joined with `", "` so `[3, 7, 9]` reads `3, 7, 9`.
/// Arrays and objects always count as present, even when empty.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
