//! Error types for the scrape loader
//!
//! Only the configuration error is produced by the loader itself. Selector,
//! network and serialization failures are carried through unchanged so the
//! host pipeline sees the underlying cause.

/// Errors surfaced to the host pipeline
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// Neither html nor a url could be resolved from the input
    #[error("{0}")]
    Configuration(String),

    /// A selector value that cannot be coerced into a selector specification
    #[error("Invalid selector specification for field '{field}': {reason}")]
    InvalidSpec { field: String, reason: String },

    /// The DOM engine rejected a CSS selector
    #[error("Failed to parse selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// A `?{...}` loader query that is not a JSON object
    #[error("Invalid loader query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    BlockingNetwork(#[from] Box<ureq::Error>),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl From<ureq::Error> for LoaderError {
    fn from(err: ureq::Error) -> Self {
        LoaderError::BlockingNetwork(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Message used when the input names no content to scrape
pub const MISSING_CONTENT_MESSAGE: &str = "You must provide an html or url string defining the html to be scraped:\r\n  - if the source file is .html, as its contents\r\n  - if the source file is .json, under 'html' or 'url' top-level keys";

impl LoaderError {
    pub(crate) fn missing_content() -> Self {
        LoaderError::Configuration(MISSING_CONTENT_MESSAGE.to_string())
    }
}
