//! Structured error types for vortex-table.
//!
//! The core has no fatal error class: loader rejections are swallowed at the
//! cache boundary and malformed options are normalized. These types cover the
//! few places where a failure is reported to the caller.

use futures::task::SpawnError;

/// A row loader rejected a requested range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("loading rows {start}..={end} failed: {reason}")]
pub struct LoadError {
    pub start: usize,
    pub end: usize,
    pub reason: String,
}

impl LoadError {
    pub fn new(start: usize, end: usize, reason: impl Into<String>) -> Self {
        Self {
            start,
            end,
            reason: reason.into(),
        }
    }
}

/// All errors surfaced by the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Row loader rejection.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The executor refused a fetch future.
    #[error("spawning page fetch failed: {0}")]
    Spawn(#[from] SpawnError),

    /// Options JSON could not be parsed at all.
    #[error("invalid options: {0}")]
    Config(#[from] serde_json::Error),

    /// Surface or frame scheduling failure in a host binding.
    #[error("render error: {0}")]
    Render(String),

    /// Catch-all for host-provided messages.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_message_names_the_range() {
        let err = GridError::from(LoadError::new(100, 199, "timeout"));
        assert_eq!(err.to_string(), "loading rows 100..=199 failed: timeout");
    }

    #[test]
    fn string_conversion_is_catch_all() {
        let err: GridError = "boom".into();
        assert!(matches!(err, GridError::Other(ref s) if s == "boom"));
    }
}
