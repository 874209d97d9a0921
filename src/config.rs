//! Grid configuration.
//!
//! Options arrive as camelCase JSON (or are built in Rust). Every field has a
//! default, and [`GridOptions::normalized`] replaces malformed values with
//! their defaults so the rest of the crate can rely on positive sizes and
//! parseable colors.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::layout::Viewport;
use crate::render::colors::{palette, parse_color};
use crate::types::{Column, Row};

pub const DEFAULT_ROW_HEIGHT: f64 = 35.0;
pub const DEFAULT_HEADER_HEIGHT: f64 = 40.0;
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_BUFFER_SIZE: usize = 10;
pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;

/// Colors and fonts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    /// Body font (CSS shorthand)
    pub font: String,
    pub header_font: String,
    pub background_color: String,
    pub border_color: String,
    pub grid_color: String,
    pub text_color: String,
    pub header_background_color: String,
    pub header_text_color: String,
    pub selection_color: String,
    pub hover_color: String,
    /// When set together with or instead of `font_size`, overrides `font`
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font: "14px Arial".to_string(),
            header_font: "bold 14px Arial".to_string(),
            background_color: palette::BACKGROUND.to_string(),
            border_color: palette::BORDER.to_string(),
            grid_color: palette::GRID_LINE.to_string(),
            text_color: palette::TEXT.to_string(),
            header_background_color: palette::HEADER_BACKGROUND.to_string(),
            header_text_color: palette::HEADER_TEXT.to_string(),
            selection_color: palette::SELECTION.to_string(),
            hover_color: palette::HOVER.to_string(),
            font_family: None,
            font_size: None,
        }
    }
}

impl Theme {
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        let colors = [
            ("backgroundColor", &mut self.background_color, defaults.background_color),
            ("borderColor", &mut self.border_color, defaults.border_color),
            ("gridColor", &mut self.grid_color, defaults.grid_color),
            ("textColor", &mut self.text_color, defaults.text_color),
            ("headerBackgroundColor", &mut self.header_background_color, defaults.header_background_color),
            ("headerTextColor", &mut self.header_text_color, defaults.header_text_color),
            ("selectionColor", &mut self.selection_color, defaults.selection_color),
            ("hoverColor", &mut self.hover_color, defaults.hover_color),
        ];
        for (field, value, fallback) in colors {
            match parse_color(value.as_str()) {
                Some(color) => *value = color,
                None => {
                    warn!(field, value = %value, "invalid theme color, using default");
                    *value = fallback;
                }
            }
        }

        if self.font.trim().is_empty() {
            self.font = defaults.font;
        }
        if self.header_font.trim().is_empty() {
            self.header_font = defaults.header_font;
        }
        let size = self.font_size.filter(|s| s.is_finite() && *s > 0.0);
        let family = self.font_family.as_deref().map(str::trim).filter(|f| !f.is_empty());
        if size.is_some() || family.is_some() {
            self.font = format!("{}px {}", size.unwrap_or(14.0), family.unwrap_or("Arial"));
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualScrollOptions {
    /// When disabled every row is fetched up front
    pub enabled: bool,
    /// Extra rows fetched above and below the visible window
    pub buffer_size: usize,
    /// Rows before the next page boundary at which that page is preloaded
    pub preload_threshold: usize,
}

impl Default for VirtualScrollOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
            preload_threshold: crate::data::PRELOAD_THRESHOLD_ROWS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationOptions {
    /// Open on `page_num` instead of the first row
    pub enabled: bool,
    /// Rows per cache page (and per navigation page)
    pub page_size: usize,
    /// 1-based
    pub page_num: usize,
    pub total: usize,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            page_size: DEFAULT_PAGE_SIZE,
            page_num: 1,
            total: 0,
        }
    }
}

/// Widget options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    pub width: f64,
    pub height: f64,
    pub row_height: f64,
    pub header_height: f64,
    pub total_rows: usize,
    pub show_header: bool,
    pub show_grid: bool,
    pub theme: Theme,
    pub virtual_scroll: VirtualScrollOptions,
    pub pagination: PaginationOptions,
    pub columns: Vec<Column>,
    /// Inline rows, served by an in-memory loader when no loader is set
    pub data: Vec<Row>,
    pub device_pixel_ratio: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            row_height: DEFAULT_ROW_HEIGHT,
            header_height: DEFAULT_HEADER_HEIGHT,
            total_rows: 0,
            show_header: true,
            show_grid: true,
            theme: Theme::default(),
            virtual_scroll: VirtualScrollOptions::default(),
            pagination: PaginationOptions::default(),
            columns: Vec::new(),
            data: Vec::new(),
            device_pixel_ratio: 1.0,
        }
    }
}

fn positive_or(field: &str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(field, value, fallback, "invalid option, using default");
        fallback
    }
}

fn non_negative_or(field: &str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(field, value, fallback, "invalid option, using default");
        fallback
    }
}

impl GridOptions {
    /// Parse options JSON and normalize it.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        Ok(options.normalized())
    }

    /// Replace malformed values with defaults.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.width = non_negative_or("width", self.width, DEFAULT_WIDTH);
        self.height = non_negative_or("height", self.height, DEFAULT_HEIGHT);
        self.row_height = positive_or("rowHeight", self.row_height, DEFAULT_ROW_HEIGHT);
        self.header_height = non_negative_or("headerHeight", self.header_height, DEFAULT_HEADER_HEIGHT);
        self.device_pixel_ratio = positive_or("devicePixelRatio", self.device_pixel_ratio, 1.0);
        if self.pagination.page_size == 0 {
            warn!("pagination.pageSize is 0, using default");
            self.pagination.page_size = DEFAULT_PAGE_SIZE;
        }
        self.pagination.page_num = self.pagination.page_num.max(1);
        if self.total_rows == 0 {
            self.total_rows = if self.pagination.total > 0 {
                self.pagination.total
            } else {
                self.data.len()
            };
        }
        self.theme = self.theme.normalized();
        self
    }

    /// Apply a new widget size and device pixel ratio. Only these fields are
    /// validated; row count and pagination stay as the controller set them.
    pub fn set_size(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = non_negative_or("width", width, DEFAULT_WIDTH);
        self.height = non_negative_or("height", height, DEFAULT_HEIGHT);
        self.device_pixel_ratio = positive_or("devicePixelRatio", dpr, 1.0);
    }

    /// Header band height, zero when the header is hidden
    pub fn effective_header_height(&self) -> f64 {
        if self.show_header {
            self.header_height.min(self.height)
        } else {
            0.0
        }
    }

    /// Size of the scrollable data area below the header
    pub fn data_viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height - self.effective_header_height())
    }

    /// Size of the header band
    pub fn header_viewport(&self) -> Viewport {
        Viewport::new(self.width, self.effective_header_height())
    }

    /// Cache page size
    pub fn page_size(&self) -> usize {
        self.pagination.page_size.max(1)
    }
}
