//! Input resolution
//!
//! The raw loader source is one of:
//! - a JSON descriptor `{ "html"?, "url"?, "selectors"? }`
//! - raw HTML markup (contains both `<` and `>`)
//! - a bare URL

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::parse_query;
use crate::error::{LoaderError, Result};
use crate::selectors::{type_name, SelectorMap};

/// Where the HTML to scrape comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    InlineHtml(String),
    RemoteUrl(String),
}

/// Input resolved once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub source: InputSource,
    pub selectors: Option<SelectorMap>,
}

/// Resolve the loader source, falling back to `query` for selectors
pub fn resolve(source: &str, query: Option<&str>) -> Result<ResolvedInput> {
    let (html, url, selectors) = match serde_json::from_str::<Value>(source) {
        Ok(Value::Object(descriptor)) => {
            debug!("loader source is a JSON descriptor");
            let selectors = match descriptor.get("selectors") {
                None | Some(Value::Null) => None,
                Some(value) => Some(SelectorMap::try_from(value)?),
            };
            (
                string_field(&descriptor, "html")?,
                string_field(&descriptor, "url")?,
                selectors,
            )
        }
        Ok(other) => {
            debug!(kind = type_name(&other), "loader source is JSON without descriptor keys");
            (None, None, None)
        }
        Err(e) => {
            debug!(error = %e, "loader source is not JSON");
            if source.contains('<') && source.contains('>') {
                debug!("loader source is inline HTML");
                (Some(source.to_string()), None, None)
            } else {
                let url = source.trim();
                debug!(url, "loader source is a URL");
                (None, (!url.is_empty()).then(|| url.to_string()), None)
            }
        }
    };

    // An empty query supplies no configuration
    let query = query.filter(|q| !q.trim().is_empty());
    let selectors = match (selectors, query) {
        (Some(selectors), _) => Some(selectors),
        (None, Some(query)) => Some(SelectorMap::from_json(&parse_query(query)?)?),
        (None, None) => None,
    };

    let source = match (html, url) {
        (Some(html), _) => InputSource::InlineHtml(html),
        (None, Some(url)) => InputSource::RemoteUrl(url),
        (None, None) => return Err(LoaderError::missing_content()),
    };

    Ok(ResolvedInput { source, selectors })
}

/// Read an optional string key; empty strings count as unset
fn string_field(descriptor: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match descriptor.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(LoaderError::Configuration(format!(
            "'{key}' must be a string"
        ))),
    }
}
