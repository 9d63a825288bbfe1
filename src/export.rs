//! Module export rendering

use serde::Serialize;

use crate::error::Result;
use crate::scrape::ExtractionResult;

/// Value exported by the generated module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExportValue {
    /// Raw document, exported when no selectors were given
    Html(String),
    Extracted(ExtractionResult),
}

/// Render `module.exports = <value>;` with two-space indented JSON
pub fn render(value: &ExportValue) -> Result<String> {
    Ok(format!(
        "module.exports = {};",
        serde_json::to_string_pretty(value)?
    ))
}
