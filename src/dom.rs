//! DOM query adapter over the scraper crate
//!
//! Parses a document once; query contexts borrow element handles from it.

use std::collections::{HashMap, HashSet};

use scraper::{ElementRef, Html, Selector};

use crate::error::{LoaderError, Result};

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Context holding the `<html>` element
    pub fn root(&self) -> QueryContext<'_> {
        QueryContext {
            document: &self.html,
            elements: vec![self.html.root_element()],
        }
    }
}

/// Ordered, deduplicated set of matched elements
#[derive(Clone)]
pub struct QueryContext<'a> {
    document: &'a Html,
    elements: Vec<ElementRef<'a>>,
}

impl<'a> QueryContext<'a> {
    /// Descendants of every element in this context matching `selector`,
    /// without duplicates and in document order.
    ///
    /// Only the matched element must lie inside the context. The rest of a
    /// compound selector is matched against the whole document, so from a
    /// `.post` context `".post p"` still finds its paragraphs (the
    /// `querySelectorAll` rule, looser than jQuery's scoped `find`).
    pub fn find(&self, selector: &str) -> Result<QueryContext<'a>> {
        let parsed = parse_selector(selector)?;

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for element in &self.elements {
            for found in element.select(&parsed) {
                if seen.insert(found.id()) {
                    matched.push(found);
                }
            }
        }

        // A single scope already yields document order
        if self.elements.len() > 1 && matched.len() > 1 {
            let order: HashMap<_, usize> = self
                .document
                .tree
                .root()
                .descendants()
                .map(|node| node.id())
                .filter(|id| seen.contains(id))
                .enumerate()
                .map(|(position, id)| (id, position))
                .collect();
            matched.sort_by_key(|element| order.get(&element.id()).copied());
        }

        Ok(QueryContext {
            document: self.document,
            elements: matched,
        })
    }

    /// Inner markup of each element, trimmed and whitespace-collapsed
    pub fn texts(&self) -> Vec<String> {
        self.elements
            .iter()
            .map(|element| collapse_whitespace(&element.inner_html()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| LoaderError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Trim and replace every whitespace run with a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
