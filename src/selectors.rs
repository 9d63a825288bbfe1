//! Selector specification model
//!
//! A specification maps field names to selector sequences. Each element of a
//! sequence either narrows the query context with a CSS selector or nests a
//! further named mapping:
//!
//! ```text
//! {
//!     "paragraphs": ".post p",
//!     "intro": [".post, .content", ".intro"],
//!     "content": [".content", { "heading": "h1, h2, h3", "body": ".body" }]
//! }
//! ```

use serde_json::{Map, Value};

use crate::error::{LoaderError, Result};

/// One step of a field's selector sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorElement {
    /// CSS selector applied as a descendant search from the current context
    Narrow(String),
    /// Named sub-mapping scraped against the narrowed context
    Nested(SelectorMap),
}

/// Ordered mapping from field name to selector sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorMap {
    fields: Vec<(String, Vec<SelectorElement>)>,
}

impl SelectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing value in its original position
    pub fn insert(&mut self, field: impl Into<String>, selector: Vec<SelectorElement>) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = selector,
            None => self.fields.push((field, selector)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[SelectorElement]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, selector)| selector.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SelectorElement])> {
        self.fields
            .iter()
            .map(|(name, selector)| (name.as_str(), selector.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a specification from a JSON object
    pub fn from_json(object: &Map<String, Value>) -> Result<Self> {
        let mut map = SelectorMap::new();
        for (field, value) in object {
            map.insert(field.clone(), field_selector(field, value)?);
        }
        Ok(map)
    }
}

impl TryFrom<&Value> for SelectorMap {
    type Error = LoaderError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Object(object) => SelectorMap::from_json(object),
            other => Err(LoaderError::InvalidSpec {
                field: "selectors".to_string(),
                reason: format!("expected an object, found {}", type_name(other)),
            }),
        }
    }
}

/// Coerce one field value into a selector sequence
fn field_selector(field: &str, value: &Value) -> Result<Vec<SelectorElement>> {
    match value {
        Value::String(selector) => Ok(vec![SelectorElement::Narrow(selector.clone())]),
        Value::Object(object) => Ok(vec![SelectorElement::Nested(SelectorMap::from_json(
            object,
        )?)]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(selector) => Ok(SelectorElement::Narrow(selector.clone())),
                Value::Object(object) => SelectorMap::from_json(object).map(SelectorElement::Nested),
                other => Err(LoaderError::InvalidSpec {
                    field: field.to_string(),
                    reason: format!(
                        "sequence elements must be strings or objects, found {}",
                        type_name(other)
                    ),
                }),
            })
            .collect(),
        other => Err(LoaderError::InvalidSpec {
            field: field.to_string(),
            reason: format!(
                "expected a string, array or object, found {}",
                type_name(other)
            ),
        }),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
