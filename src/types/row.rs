use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identifier for rows and columns (numeric or string, as supplied).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl Default for Id {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl From<i64> for Id {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Id {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// One row produced by a row loader. The core never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: Id,
    /// Absolute row index in the dataset
    #[serde(default)]
    pub index: usize,
    /// Column key -> value
    #[serde(default)]
    pub data: HashMap<String, CellValue>,
}

impl Row {
    pub fn new(id: impl Into<Id>, index: usize) -> Self {
        Self {
            id: id.into(),
            index,
            data: HashMap::new(),
        }
    }

    /// Builder-style field setter
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<CellValue>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.data.get(key)
    }

    /// Display text for a column key; empty when the field is missing
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(ToString::to_string).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_display_without_trailing_zero() {
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Number(0.0).to_string(), "0");
    }

    #[test]
    fn row_deserializes_mixed_values() {
        let row: Row =
            serde_json::from_str(r#"{"id":"r-7","index":7,"data":{"name":"Ada","age":36}}"#)
                .unwrap_or_default();
        assert_eq!(row.id, Id::from("r-7"));
        assert_eq!(row.index, 7);
        assert_eq!(row.text("name"), "Ada");
        assert_eq!(row.text("age"), "36");
        assert_eq!(row.text("missing"), "");
    }
}
