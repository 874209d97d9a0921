use serde::{Deserialize, Serialize};

use super::Id;

/// Width used when a column's width is zero, negative or not a number.
pub const DEFAULT_COL_WIDTH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Column definition, supplied externally and replaced only as a whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    pub id: Id,
    /// Field key into `Row::data`
    pub key: String,
    pub title: String,
    pub width: f64,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub align: Align,
    pub sortable: bool,
    pub filterable: bool,
    pub resizable: bool,
    pub frozen: bool,
    pub hidden: bool,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            id: Id::default(),
            key: String::new(),
            title: String::new(),
            width: DEFAULT_COL_WIDTH,
            column_type: ColumnType::Text,
            align: Align::Left,
            sortable: false,
            filterable: false,
            resizable: false,
            frozen: false,
            hidden: false,
        }
    }
}

impl Column {
    /// Column whose id, key and title are all `key`.
    pub fn new(key: &str, width: f64) -> Self {
        Self {
            id: Id::from(key),
            key: key.to_string(),
            title: key.to_string(),
            width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn titled(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    #[must_use]
    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Width actually laid out: hidden columns take no space, unusable
    /// widths fall back to [`DEFAULT_COL_WIDTH`].
    pub fn effective_width(&self) -> f64 {
        if self.hidden {
            0.0
        } else if self.width.is_finite() && self.width > 0.0 {
            self.width
        } else {
            DEFAULT_COL_WIDTH
        }
    }
}
