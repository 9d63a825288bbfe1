//! Loader invocation
//!
//! A [`LoaderContext`] is created by the host pipeline for each source file.
//! Inline HTML is transformed immediately; a URL yields a [`PendingFetch`]
//! which the host completes once the body has arrived.

use tracing::debug;

use crate::dom::Document;
use crate::error::Result;
use crate::export::{render, ExportValue};
use crate::fetch::{fetch, fetch_blocking};
use crate::resolve::{resolve, InputSource};
use crate::scrape::scrape;
use crate::selectors::SelectorMap;

/// Per-invocation state shared with the host pipeline
#[derive(Debug, Clone, Default)]
pub struct LoaderContext {
    /// Query string attached to the invocation, e.g. `?title=h1`
    pub query: Option<String>,
    /// Set on every invocation; output depends only on the input
    pub cacheable: bool,
    /// Last exported value
    pub value: Option<ExportValue>,
}

/// Outcome of [`LoaderContext::transform`]
#[derive(Debug)]
pub enum Transform {
    Ready(String),
    Pending(PendingFetch),
}

/// A URL to fetch before the export can be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    url: String,
    selectors: Option<SelectorMap>,
}

impl PendingFetch {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<String> {
        fetch(&self.url).await
    }

    pub fn fetch_blocking(&self) -> Result<String> {
        fetch_blocking(&self.url)
    }
}

impl LoaderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Resolve `source` and export it if no fetch is needed
    pub fn transform(&mut self, source: &str) -> Result<Transform> {
        self.cacheable = true;

        let resolved = resolve(source, self.query.as_deref())?;
        match resolved.source {
            InputSource::InlineHtml(html) => self
                .export(&html, resolved.selectors.as_ref())
                .map(Transform::Ready),
            InputSource::RemoteUrl(url) => {
                debug!(url, "deferring export until fetch completes");
                Ok(Transform::Pending(PendingFetch {
                    url,
                    selectors: resolved.selectors,
                }))
            }
        }
    }

    /// Export the fetched body of `pending`
    pub fn complete(&mut self, pending: PendingFetch, html: &str) -> Result<String> {
        self.export(html, pending.selectors.as_ref())
    }

    /// Transform `source`, awaiting the fetch when a URL was given
    pub async fn run(&mut self, source: &str) -> Result<String> {
        match self.transform(source)? {
            Transform::Ready(code) => Ok(code),
            Transform::Pending(pending) => {
                let html = pending.fetch().await?;
                self.complete(pending, &html)
            }
        }
    }

    /// Transform `source`, fetching synchronously when a URL was given
    pub fn run_blocking(&mut self, source: &str) -> Result<String> {
        match self.transform(source)? {
            Transform::Ready(code) => Ok(code),
            Transform::Pending(pending) => {
                let html = pending.fetch_blocking()?;
                self.complete(pending, &html)
            }
        }
    }

    fn export(&mut self, html: &str, selectors: Option<&SelectorMap>) -> Result<String> {
        let value = match selectors {
            Some(selectors) => {
                let document = Document::parse(html);
                ExportValue::Extracted(scrape(selectors, &document.root())?)
            }
            None => ExportValue::Html(html.to_string()),
        };

        let code = render(&value)?;
        self.value = Some(value);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoaderError;
    use crate::fetch::test_server::serve_once;

    const PAGE: &str = r#"<html><body><div class="post"><p>A</p><p> B  C </p><p>D</p></div></body></html>"#;

    #[test]
    fn test_inline_html_with_query_selectors() {
        let mut ctx = LoaderContext::with_query("?paragraphs=.post%20p");
        let code = match ctx.transform(PAGE).unwrap() {
            Transform::Ready(code) => code,
            Transform::Pending(p) => panic!("unexpected fetch of {}", p.url()),
        };

        assert!(ctx.cacheable);
        assert_eq!(
            code,
            "module.exports = {\n  \"paragraphs\": [\n    \"A\",\n    \"B C\",\n    \"D\"\n  ]\n};"
        );
        assert!(matches!(ctx.value, Some(ExportValue::Extracted(_))));
    }

    #[test]
    fn test_inline_html_without_selectors_exports_document() {
        let mut ctx = LoaderContext::new();
        let code = ctx.run_blocking("<p>raw</p>").unwrap();
        assert_eq!(code, "module.exports = \"<p>raw</p>\";");
        assert_eq!(ctx.value, Some(ExportValue::Html("<p>raw</p>".to_string())));
    }

    #[test]
    fn test_empty_query_exports_document() {
        let mut ctx = LoaderContext::with_query("");
        let code = ctx.run_blocking("<p>raw</p>").unwrap();
        assert_eq!(code, "module.exports = \"<p>raw</p>\";");
    }

    #[test]
    fn test_bare_url_defers_to_fetch() {
        let mut ctx = LoaderContext::new();
        match ctx.transform("http://example.com/page").unwrap() {
            Transform::Pending(pending) => assert_eq!(pending.url(), "http://example.com/page"),
            Transform::Ready(code) => panic!("expected a pending fetch, got {code}"),
        }
        assert!(ctx.value.is_none());
    }

    #[test]
    fn test_complete_pending_fetch() {
        let mut ctx = LoaderContext::new();
        let source = r#"{ "url": "http://example.com", "selectors": { "p": ".post p" } }"#;
        let Transform::Pending(pending) = ctx.transform(source).unwrap() else {
            panic!("expected a pending fetch");
        };

        let code = ctx.complete(pending, PAGE).unwrap();
        assert!(code.contains("\"B C\""));
    }

    #[test]
    fn test_empty_source_fails_synchronously() {
        let mut ctx = LoaderContext::new();
        let err = ctx.transform("  ").unwrap_err();
        assert!(matches!(err, LoaderError::Configuration(_)));
        assert!(ctx.value.is_none());
    }

    #[test]
    fn test_selector_error_emits_nothing() {
        let mut ctx = LoaderContext::new();
        let source = r#"{ "html": "<p>x</p>", "selectors": { "bad": "p[" } }"#;
        let err = ctx.run_blocking(source).unwrap_err();
        assert!(matches!(err, LoaderError::Selector { .. }));
        assert!(ctx.value.is_none());
    }

    #[tokio::test]
    async fn test_run_fetches_url_without_selectors() {
        let url = serve_once("200 OK", PAGE);
        let mut ctx = LoaderContext::new();
        let code = ctx.run(&format!(r#"{{ "url": "{url}" }}"#)).await.unwrap();

        assert_eq!(code, format!("module.exports = {};", serde_json::to_string(PAGE).unwrap()));
        assert_eq!(ctx.value, Some(ExportValue::Html(PAGE.to_string())));
    }

    #[tokio::test]
    async fn test_run_fetches_bare_url_and_scrapes() {
        let url = serve_once("200 OK", PAGE);
        let mut ctx = LoaderContext::with_query(r#"?{"paragraphs":".post p"}"#);
        ctx.run(&url).await.unwrap();

        let Some(ExportValue::Extracted(result)) = &ctx.value else {
            panic!("expected extraction, got {:?}", ctx.value);
        };
        assert_eq!(
            serde_json::to_value(result).unwrap(),
            serde_json::json!({ "paragraphs": ["A", "B C", "D"] })
        );
    }

    #[test]
    fn test_run_blocking_fetches_url() {
        let url = serve_once("200 OK", PAGE);
        let mut ctx = LoaderContext::with_query("?first=p");
        let code = ctx.run_blocking(&format!("{url}\n")).unwrap();
        assert!(code.contains("\"first\""));
    }
}
