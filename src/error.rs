//! Structured error types for scrollgrid.
//!
//! Geometry itself is total and never fails; errors are confined to
//! configuration intake, DOM wiring and layout inspection.

/// All errors that can occur in scrollgrid configuration and inspection.
#[derive(Debug, thiserror::Error)]
pub enum ScrollGridError {
    /// Invalid or inconsistent grid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// Ambiguous or contradictory visual state found while inspecting
    /// rendered rows. Surfaced hard instead of guessing a default.
    #[error("Layout inspection: {0}")]
    Inspection(String),

    /// DOM access failure (missing element, detached node).
    #[error("DOM error: {0}")]
    Dom(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors during migration.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScrollGridError>;

impl From<String> for ScrollGridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ScrollGridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ScrollGridError> for wasm_bindgen::JsValue {
    fn from(e: ScrollGridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
