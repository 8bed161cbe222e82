// plausible-core/src/domain/record.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One attribute value of a location record.
///
/// Incoming datasets are loosely typed (numbers stored as text, lists stored
/// as a single string...). The accessors on [`Record`] do the coercion so the
/// checks only ever see `f64` or `&str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    StringList(Vec<String>),
}

impl FieldValue {
    /// Null, empty text and the literal `"NULL"` all count as "no value".
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => {
                let s = s.trim();
                s.is_empty() || s == "NULL"
            }
            Self::StringList(items) => items.is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Numeric view of the value. Text is parsed after trimming.
    /// Booleans and lists are never numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// List view of the value. A bare string is a one-element list.
    pub fn as_list(&self) -> Option<Vec<&str>> {
        match self {
            Self::StringList(items) => Some(items.iter().map(String::as_str).collect()),
            Self::String(s) if !s.trim().is_empty() => Some(vec![s.as_str()]),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::StringList(_) => "list",
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        Self::StringList(items.into_iter().map(str::to_string).collect())
    }
}

/// A location entity as handed over by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder used by loaders and tests.
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Present (non-blank) value of a field.
    pub fn present(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).filter(|v| !v.is_blank())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn string_list(&self, name: &str) -> Option<Vec<&str>> {
        self.get(name).and_then(FieldValue::as_list)
    }

    /// Case-insensitive membership test on a list field (whole entries).
    pub fn list_contains(&self, name: &str, needle: &str) -> Option<bool> {
        self.string_list(name)
            .map(|items| items.iter().any(|i| i.trim().eq_ignore_ascii_case(needle)))
    }
}
