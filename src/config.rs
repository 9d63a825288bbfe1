//! Loader query configuration
//!
//! Host pipelines may attach a query string to the loader invocation, e.g.
//! `?title=h1&links[]=nav a&links[]=footer a` or `?{"title":"h1"}`. It is
//! parsed into a JSON object which then stands in for a missing `selectors`
//! key.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::{LoaderError, Result};

/// Parse a loader query string into a JSON object
pub fn parse_query(query: &str) -> Result<Map<String, Value>> {
    let query = query.trim();
    let query = query.strip_prefix('?').unwrap_or(query);

    if query.is_empty() {
        return Ok(Map::new());
    }

    if query.starts_with('{') {
        return match serde_json::from_str::<Value>(query) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(_) => Err(LoaderError::InvalidQuery("expected a JSON object".to_string())),
            Err(e) => Err(LoaderError::InvalidQuery(e.to_string())),
        };
    }

    let mut result = Map::new();
    for part in query.split(&['&', ','][..]).filter(|part| !part.is_empty()) {
        let (key, value) = match part.split_once('=') {
            Some((key, value)) => (decode(key), Some(decode(value))),
            None => (decode(part), None),
        };

        match value {
            Some(value) => {
                if let Some(array_key) = key.strip_suffix("[]") {
                    let entry = result
                        .entry(array_key.to_string())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    match entry {
                        Value::Array(items) => items.push(Value::String(value)),
                        other => *other = Value::Array(vec![Value::String(value)]),
                    }
                } else {
                    result.insert(key, Value::String(value));
                }
            }
            // Flag prefixes are read before decoding, which maps '+' to a space
            None => {
                if let Some(flag) = part.strip_prefix('-') {
                    result.insert(decode(flag), Value::Bool(false));
                } else {
                    let flag = part.strip_prefix('+').unwrap_or(part);
                    result.insert(decode(flag), Value::Bool(true));
                }
            }
        }
    }

    Ok(result)
}

fn decode(text: &str) -> String {
    form_urlencoded::parse(format!("x={text}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}
