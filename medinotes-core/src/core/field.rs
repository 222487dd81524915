use serde::{Deserialize, Serialize};
use std::fmt;

/// The value held by a single note field.
///
/// Serialized untagged, so a scalar is a JSON string and a list is a JSON
/// array of strings. The kind is whatever was last assigned; nothing is
/// coerced on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Returns `true` for `""` and for a list with no items.
    ///
    /// Whitespace is not trimmed: `" "` counts as present.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Lists display as their items joined with `"; "`.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => f.write_str(&items.join("; ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(items: [&str; N]) -> Self {
        FieldValue::List(items.iter().map(|s| s.to_string()).collect())
    }
}
