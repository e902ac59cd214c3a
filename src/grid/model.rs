//! Pure composition state for the scroll grid.
//!
//! Tracks sections × chunks × column groups, the natural row heights each
//! chunk reported, and the authoritative scroll offsets per sync group.
//! The DOM driver in the parent module reads propagation plans from here
//! and applies them; nothing in this file touches the platform.

use crate::error::{Result, ScrollGridError};

use super::config::{ChunkKind, GridConfig, PaneWidth, SectionKind};

/// Index of the data-grid pane's column group. The divider and time pane
/// follow it, mirroring the visual order.
pub const RESOURCE_COL_GROUP: usize = 0;

#[derive(Debug, Clone)]
struct ColumnGroupState {
    configured_width: PaneWidth,
    /// Live pixel width once resolved (mutated by the divider resizer).
    resolved_width: Option<f64>,
    col_widths: Vec<Option<f64>>,
    /// Authoritative horizontal offset shared by every chunk in this
    /// group (normalized, leading-edge origin).
    scroll_left: f64,
}

#[derive(Debug, Clone)]
struct ChunkState {
    kind: ChunkKind,
    scrollable: bool,
    natural_heights: Vec<f64>,
}

#[derive(Debug, Clone)]
struct SectionState {
    kind: SectionKind,
    sync_row_heights: bool,
    is_sticky: bool,
    /// Authoritative vertical offset shared by every chunk in this
    /// section.
    scroll_top: f64,
    chunks: Vec<ChunkState>,
}

/// Per-row maximum across chunks: the synchronized height assignment for
/// one section. Chunks that have not reported yet (shorter vectors)
/// simply contribute nothing to rows they don't cover.
pub fn max_row_heights(chunks: &[Vec<f64>]) -> Vec<f64> {
    let rows = chunks.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows)
        .map(|row| {
            chunks
                .iter()
                .filter_map(|heights| heights.get(row))
                .fold(0.0_f64, |acc, h| acc.max(*h))
        })
        .collect()
}

/// The grid's composition model. One instance per rendered grid.
#[derive(Debug, Clone)]
pub struct GridModel {
    col_groups: Vec<ColumnGroupState>,
    sections: Vec<SectionState>,
}

impl GridModel {
    /// Build from a validated configuration.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        config.validate()?;

        let col_groups = config
            .col_groups
            .iter()
            .map(|group| ColumnGroupState {
                configured_width: group.width,
                resolved_width: group.width.as_px(),
                col_widths: group.cols.iter().map(|c| c.width).collect(),
                scroll_left: 0.0,
            })
            .collect();

        let sections = config
            .sections
            .iter()
            .map(|section| SectionState {
                kind: section.kind,
                sync_row_heights: section.sync_row_heights,
                is_sticky: section.is_sticky,
                scroll_top: 0.0,
                chunks: section
                    .chunks
                    .iter()
                    .map(|chunk| ChunkState {
                        kind: chunk.kind,
                        scrollable: chunk.scrollable,
                        natural_heights: Vec::new(),
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            col_groups,
            sections,
        })
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn col_group_count(&self) -> usize {
        self.col_groups.len()
    }

    pub fn section_kind(&self, section: usize) -> Option<SectionKind> {
        self.sections.get(section).map(|s| s.kind)
    }

    /// Sections flagged to stay pinned within the overall scroll
    /// container.
    pub fn sticky_sections(&self) -> Vec<usize> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_sticky)
            .map(|(i, _)| i)
            .collect()
    }

    fn section_mut(&mut self, section: usize) -> Result<&mut SectionState> {
        let count = self.sections.len();
        self.sections.get_mut(section).ok_or_else(|| {
            ScrollGridError::Config(format!("section index {section} out of range ({count})"))
        })
    }

    fn col_group_mut(&mut self, group: usize) -> Result<&mut ColumnGroupState> {
        let count = self.col_groups.len();
        self.col_groups.get_mut(group).ok_or_else(|| {
            ScrollGridError::Config(format!("column group index {group} out of range ({count})"))
        })
    }

    // Row heights -----------------------------------------------------------

    /// Record one chunk's measured natural row heights. Re-run the
    /// measurement whenever any chunk signals content change.
    pub fn set_natural_heights(
        &mut self,
        section: usize,
        chunk: usize,
        heights: Vec<f64>,
    ) -> Result<()> {
        let section_state = self.section_mut(section)?;
        let chunk_count = section_state.chunks.len();
        let chunk_state = section_state.chunks.get_mut(chunk).ok_or_else(|| {
            ScrollGridError::Config(format!("chunk index {chunk} out of range ({chunk_count})"))
        })?;
        chunk_state.natural_heights = heights;
        Ok(())
    }

    /// Authoritative per-row heights for a section: the per-row maximum
    /// across its content chunks. Idempotent: with unchanged inputs the
    /// assignment is unchanged.
    pub fn synced_row_heights(&self, section: usize) -> Vec<f64> {
        let Some(section_state) = self.sections.get(section) else {
            return Vec::new();
        };
        let reported: Vec<Vec<f64>> = section_state
            .chunks
            .iter()
            .filter(|c| c.kind == ChunkKind::Content)
            .map(|c| c.natural_heights.clone())
            .collect();
        max_row_heights(&reported)
    }

    pub fn wants_row_height_sync(&self, section: usize) -> bool {
        self.sections
            .get(section)
            .is_some_and(|s| s.sync_row_heights)
    }

    // Scroll sync -----------------------------------------------------------

    /// Set the shared horizontal offset of a column group. Returns the
    /// stored (non-negative) value; every member chunk must be moved to
    /// it in the same pass.
    pub fn force_scroll_left(&mut self, col_group: usize, offset: f64) -> Result<f64> {
        let group = self.col_group_mut(col_group)?;
        group.scroll_left = offset.max(0.0);
        Ok(group.scroll_left)
    }

    /// Current shared horizontal offset of a column group.
    pub fn scroll_left(&self, col_group: usize) -> f64 {
        self.col_groups
            .get(col_group)
            .map_or(0.0, |g| g.scroll_left)
    }

    /// Set the shared vertical offset of a section.
    pub fn force_scroll_top(&mut self, section: usize, offset: f64) -> Result<f64> {
        let section_state = self.section_mut(section)?;
        section_state.scroll_top = offset.max(0.0);
        Ok(section_state.scroll_top)
    }

    /// Current shared vertical offset of a section.
    pub fn scroll_top(&self, section: usize) -> f64 {
        self.sections.get(section).map_or(0.0, |s| s.scroll_top)
    }

    /// Chunks whose scroller must agree with a column group's horizontal
    /// offset, as `(section, chunk)` coordinates.
    pub fn scroll_group_members(&self, col_group: usize) -> Vec<(usize, usize)> {
        self.sections
            .iter()
            .enumerate()
            .filter_map(|(si, section)| {
                section
                    .chunks
                    .get(col_group)
                    .filter(|c| c.scrollable && c.kind == ChunkKind::Content)
                    .map(|_| (si, col_group))
            })
            .collect()
    }

    /// Scrollable chunks within one section (vertical sync group).
    pub fn section_members(&self, section: usize) -> Vec<usize> {
        self.sections
            .get(section)
            .map(|s| {
                s.chunks
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.scrollable && c.kind == ChunkKind::Content)
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First body section: the one whose vertical offset is exposed for
    /// persisting/restoring across layout rebuilds.
    pub fn body_section(&self) -> Option<usize> {
        self.sections.iter().position(|s| s.kind == SectionKind::Body)
    }

    /// Vertical offset of the body section.
    pub fn resource_scroll(&self) -> f64 {
        self.body_section().map_or(0.0, |i| self.scroll_top(i))
    }

    // Resource area width ---------------------------------------------------

    /// Configured width of the data-grid pane.
    pub fn configured_resource_width(&self) -> PaneWidth {
        self.col_groups
            .get(RESOURCE_COL_GROUP)
            .map_or(PaneWidth::Auto, |g| g.configured_width)
    }

    /// Live data-grid pane width, if already concrete.
    pub fn resource_area_width(&self) -> Option<f64> {
        self.col_groups
            .get(RESOURCE_COL_GROUP)
            .and_then(|g| g.resolved_width)
    }

    /// Install a new authoritative data-grid pane width (from the divider
    /// resizer). Persists for the life of the instance.
    pub fn set_resource_area_width(&mut self, width: f64) -> Result<()> {
        self.col_group_mut(RESOURCE_COL_GROUP)?.resolved_width = Some(width);
        Ok(())
    }

    /// Per-column pixel widths of a group, where configured.
    pub fn col_widths(&self, col_group: usize) -> Vec<Option<f64>> {
        self.col_groups
            .get(col_group)
            .map(|g| g.col_widths.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_max_row_heights_takes_per_row_max() {
        let heights = max_row_heights(&[vec![20.0, 35.0, 20.0], vec![24.0, 30.0, 48.0]]);
        assert_eq!(heights, vec![24.0, 35.0, 48.0]);
    }

    #[test]
    fn test_max_row_heights_tolerates_late_content() {
        // Second chunk's content has not arrived yet.
        let heights = max_row_heights(&[vec![20.0, 22.0], vec![]]);
        assert_eq!(heights, vec![20.0, 22.0]);
    }

    #[test]
    fn test_max_row_heights_empty() {
        assert!(max_row_heights(&[]).is_empty());
    }
}
