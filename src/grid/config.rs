//! Grid configuration handed over by the view layer.
//!
//! Arrives as a JS options object (via `serde-wasm-bindgen`) or as JSON
//! (CLI, tests). Field names are camelCase on the wire to match the
//! JavaScript host.

use serde::Deserialize;

use crate::error::{Result, ScrollGridError};

/// A configured pane/column width: concrete pixels, a proportion of the
/// live rendered width, or automatic.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawPaneWidth")]
pub enum PaneWidth {
    Px(f64),
    Pct(f64),
    Auto,
}

impl Default for PaneWidth {
    fn default() -> Self {
        Self::Auto
    }
}

impl PaneWidth {
    /// Concrete pixel value, if this width is already one.
    pub fn as_px(self) -> Option<f64> {
        match self {
            Self::Px(v) => Some(v),
            _ => None,
        }
    }

    /// Resolve against a live total width. `Auto` stays unresolved; the
    /// caller falls back to measuring the rendered element.
    pub fn resolve(self, total_width: f64) -> Option<f64> {
        match self {
            Self::Px(v) => Some(v),
            Self::Pct(p) => Some(total_width * p / 100.0),
            Self::Auto => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPaneWidth {
    Number(f64),
    Text(String),
}

impl TryFrom<RawPaneWidth> for PaneWidth {
    type Error = String;

    fn try_from(raw: RawPaneWidth) -> std::result::Result<Self, String> {
        match raw {
            RawPaneWidth::Number(v) => Ok(Self::Px(v)),
            RawPaneWidth::Text(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("auto") {
                    Ok(Self::Auto)
                } else if let Some(pct) = s.strip_suffix('%') {
                    pct.trim()
                        .parse::<f64>()
                        .map(Self::Pct)
                        .map_err(|_| format!("invalid percentage width: {s:?}"))
                } else {
                    s.parse::<f64>()
                        .map(Self::Px)
                        .map_err(|_| format!("invalid width: {s:?}"))
                }
            }
        }
    }
}

/// Row-band kind. Order within the grid is header, body, footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Body,
    Footer,
}

/// What a chunk renders: external content, or the empty divider spacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    #[default]
    Content,
    Divider,
}

/// One column inside a column group.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColSpec {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub min_width: Option<f64>,
}

/// Named width definition shared by all chunks aligned vertically across
/// sections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroupConfig {
    #[serde(default)]
    pub width: PaneWidth,
    #[serde(default)]
    pub cols: Vec<ColSpec>,
}

/// One pane within a section.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkConfig {
    #[serde(default)]
    pub kind: ChunkKind,
    /// Whether this chunk carries its own scroller element.
    #[serde(default)]
    pub scrollable: bool,
}

/// One row-band of the grid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    pub kind: SectionKind,
    #[serde(default)]
    pub sync_row_heights: bool,
    /// Pin this section within the overall scroll container instead of
    /// letting it scroll away.
    #[serde(default)]
    pub is_sticky: bool,
    pub chunks: Vec<ChunkConfig>,
}

/// Full grid shape: column groups × sections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub col_groups: Vec<ColumnGroupConfig>,
    pub sections: Vec<SectionConfig>,
}

impl GridConfig {
    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural invariants: every section carries one chunk per column
    /// group (in column-group order), and divider chunks sit on empty
    /// column groups.
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(ScrollGridError::Config("no sections configured".into()));
        }
        for (i, section) in self.sections.iter().enumerate() {
            if section.chunks.len() != self.col_groups.len() {
                return Err(ScrollGridError::Config(format!(
                    "section {i} has {} chunks but {} column groups are defined",
                    section.chunks.len(),
                    self.col_groups.len()
                )));
            }
            for (j, chunk) in section.chunks.iter().enumerate() {
                let group_cols = self.col_groups.get(j).map_or(0, |g| g.cols.len());
                if chunk.kind == ChunkKind::Divider && group_cols != 0 {
                    return Err(ScrollGridError::Config(format!(
                        "divider chunk {j} in section {i} sits on a non-empty column group"
                    )));
                }
            }
        }
        Ok(())
    }
}
