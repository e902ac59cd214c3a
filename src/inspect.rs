//! Inspection helpers over rendered data-grid rows.
//!
//! Used by embedders and test harnesses to read hierarchy state back out
//! of the DOM. An ambiguous visual state is a hard error: guessing a
//! default here would hide a layout bug.

use crate::error::{Result, ScrollGridError};

/// Expander icon markers the row-rendering layer puts on hierarchy rows.
pub const ICON_EXPANDED: &str = "sg-icon-expanded";
pub const ICON_COLLAPSED: &str = "sg-icon-collapsed";

/// Whether a hierarchy row is currently expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowExpansion {
    Expanded,
    Collapsed,
}

/// Classify an expander icon's class attribute.
///
/// Exactly one of the two markers must be present; anything else is an
/// inconsistent render and fails hard.
pub fn classify_expander(class_value: &str) -> Result<RowExpansion> {
    let mut expanded = false;
    let mut collapsed = false;
    for class in class_value.split_whitespace() {
        if class == ICON_EXPANDED {
            expanded = true;
        } else if class == ICON_COLLAPSED {
            collapsed = true;
        }
    }
    match (expanded, collapsed) {
        (true, false) => Ok(RowExpansion::Expanded),
        (false, true) => Ok(RowExpansion::Collapsed),
        _ => Err(ScrollGridError::Inspection(format!(
            "row is neither expanded nor collapsed (classes: {class_value:?})"
        ))),
    }
}

/// Read the expansion state of a rendered row element.
#[cfg(target_arch = "wasm32")]
pub fn row_expansion(row_el: &web_sys::Element) -> Result<RowExpansion> {
    let icon = row_el
        .query_selector(".sg-expander .sg-icon")
        .ok()
        .flatten()
        .ok_or_else(|| ScrollGridError::Inspection("row has no expander icon".into()))?;
    classify_expander(&icon.class_name())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_expanded() {
        let state = classify_expander("sg-icon sg-icon-expanded").unwrap();
        assert_eq!(state, RowExpansion::Expanded);
    }

    #[test]
    fn test_classify_collapsed() {
        let state = classify_expander("sg-icon sg-icon-collapsed").unwrap();
        assert_eq!(state, RowExpansion::Collapsed);
    }

    #[test]
    fn test_neither_marker_is_a_hard_error() {
        assert!(classify_expander("sg-icon").is_err());
    }

    #[test]
    fn test_both_markers_is_a_hard_error() {
        assert!(classify_expander("sg-icon-expanded sg-icon-collapsed").is_err());
    }
}
