//! HTML scrape loader for build pipelines
//!
//! Turns a source file into `module.exports = <JSON>;` by scraping HTML with
//! a nested CSS selector specification. The HTML comes from:
//! - the file itself, when it contains markup
//! - a URL, when the file is a bare URL
//! - a JSON descriptor with `html`, `url` and `selectors` keys
//!
//! Selectors may also arrive through the loader query string.

pub mod config;
pub mod dom;
pub mod error;
pub mod export;
pub mod fetch;
pub mod ffi;
pub mod loader;
pub mod logging;
pub mod resolve;
pub mod scrape;
pub mod selectors;

pub use error::{LoaderError, Result};
pub use export::ExportValue;
pub use loader::{LoaderContext, PendingFetch, Transform};
pub use scrape::{merge, scrape, Extracted, ExtractionResult};
pub use selectors::{SelectorElement, SelectorMap};
