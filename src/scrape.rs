//! Recursive selector scraping
//!
//! Walks a [`SelectorMap`] against a query context. Within a field's sequence
//! every string narrows the context and every nested mapping is kept aside;
//! if any mappings were kept they are merged and scraped against the narrowed
//! context, otherwise the narrowed elements' text becomes the field value.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::dom::QueryContext;
use crate::error::Result;
use crate::selectors::{SelectorElement, SelectorMap};

/// Value extracted for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Texts(Vec<String>),
    Nested(ExtractionResult),
}

/// Ordered mapping from field name to extracted value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    fields: Vec<(String, Extracted)>,
}

impl ExtractionResult {
    pub fn get(&self, field: &str) -> Option<&Extracted> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Extracted)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Extracted {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Extracted::Texts(texts) => texts.serialize(serializer),
            Extracted::Nested(nested) => nested.serialize(serializer),
        }
    }
}

/// Scrape every field of `spec` starting from `context`
pub fn scrape(spec: &SelectorMap, context: &QueryContext<'_>) -> Result<ExtractionResult> {
    let mut fields = Vec::with_capacity(spec.len());

    for (field, sequence) in spec.iter() {
        let narrowed = sequence
            .iter()
            .try_fold(context.clone(), |current, element| match element {
                SelectorElement::Narrow(selector) => current.find(selector),
                SelectorElement::Nested(_) => Ok(current),
            })?;
        let nested: Vec<&SelectorMap> = sequence
            .iter()
            .filter_map(|element| match element {
                SelectorElement::Nested(map) => Some(map),
                SelectorElement::Narrow(_) => None,
            })
            .collect();

        tracing::debug!(field, matched = narrowed.len(), nested = nested.len(), "scraped field");

        let value = if nested.is_empty() {
            Extracted::Texts(narrowed.texts())
        } else {
            Extracted::Nested(scrape(&merge(&nested), &narrowed)?)
        };
        fields.push((field.to_string(), value));
    }

    Ok(ExtractionResult { fields })
}

/// Merge mappings in order; later keys override earlier ones
pub fn merge(maps: &[&SelectorMap]) -> SelectorMap {
    let mut merged = SelectorMap::new();
    for map in maps {
        for (field, selector) in map.iter() {
            merged.insert(field, selector.to_vec());
        }
    }
    merged
}
