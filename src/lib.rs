//! scrollgrid - resource-timeline scroll grid for the web
//!
//! Synchronizes the panes of a resource-timeline widget in the browser
//! via WebAssembly:
//! - Section/chunk composition with shared row heights across panes
//! - Linked horizontal scroll within column groups
//! - Sticky positioning of marked elements, emulated where native
//!   pinning is missing or broken
//! - Draggable divider resizing the data-grid pane, RTL-aware
//!
//! Row content and column definitions arrive pre-rendered from the
//! resource/timeline layers; this crate only composes, measures and
//! positions.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { ScrollGrid } from 'scrollgrid';
//! await init();
//! const grid = new ScrollGrid(rootEl, config, false);
//! grid.forceScrollLeft(2, 480);
//! ```

// Pure cores (compiled and tested natively)
pub mod error;
pub mod geom;
pub mod grid;
pub mod inspect;
pub mod listener;
pub mod resizer;
pub mod sticky;

// DOM glue (wasm only)
#[cfg(target_arch = "wasm32")]
pub(crate) mod dom;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::grid::GridModel;

pub use error::{Result, ScrollGridError};
#[cfg(target_arch = "wasm32")]
pub use grid::ScrollGrid;
pub use grid::{GridConfig, PaneWidth};
pub use sticky::STICKY_SELECTOR;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportInput {
    config: GridConfig,
    /// Measured natural row heights, indexed `[section][chunk][row]`.
    #[serde(default)]
    natural_heights: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    total_width: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportOutput {
    /// Synchronized per-row heights, one vector per section.
    row_heights: Vec<Vec<f64>>,
    resource_area_width: Option<f64>,
    sticky_sections: Vec<usize>,
}

/// Compute a synchronized-layout report from a grid config plus measured
/// natural row heights, as JSON.
///
/// This is the pure composition pass the browser driver runs per
/// content change, exposed for debugging and headless use.
///
/// # Errors
/// Returns an error if the input JSON is invalid or the configuration is
/// structurally inconsistent.
pub fn layout_report(input_json: &str) -> Result<String> {
    let input: ReportInput = serde_json::from_str(input_json)?;
    let mut model = GridModel::from_config(&input.config)?;

    for (section, chunks) in input.natural_heights.iter().enumerate() {
        for (chunk, heights) in chunks.iter().enumerate() {
            model.set_natural_heights(section, chunk, heights.clone())?;
        }
    }

    if model.resource_area_width().is_none() {
        if let Some(total) = input.total_width {
            if let Some(width) = model.configured_resource_width().resolve(total) {
                model.set_resource_area_width(width)?;
            }
        }
    }

    let row_heights = (0..model.section_count())
        .map(|section| model.synced_row_heights(section))
        .collect();
    let output = ReportOutput {
        row_heights,
        resource_area_width: model.resource_area_width(),
        sticky_sections: model.sticky_sections(),
    };
    Ok(serde_json::to_string(&output)?)
}

/// JS-facing wrapper around [`layout_report`].
///
/// # Errors
/// Returns an error if the input JSON is invalid or inconsistent.
#[wasm_bindgen]
pub fn compute_layout_report(input_json: &str) -> std::result::Result<String, JsValue> {
    layout_report(input_json).map_err(|e| JsValue::from_str(&e.to_string()))
}
