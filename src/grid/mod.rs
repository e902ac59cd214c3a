//! Grid composer: sections × chunks with synchronized heights and scroll.
//!
//! The composer does not render row content; the resource/timeline
//! layers supply it pre-rendered. It attaches to that DOM, keeps per-row
//! heights equal across the chunks of a section, keeps horizontal scroll
//! equal within each column group, owns the divider resizer, and marks
//! sticky sections for the pinning engine.
//!
//! Expected DOM shape under the root scroll container:
//! - `.sg-section` per configured section, in order
//! - `.sg-chunk` per column group inside each section, in order
//! - `.sg-scroller` inside each scrollable chunk
//! - `.sg-divider` on the divider chunk's element
//! - `tr` rows inside chunk content

mod config;
mod model;

pub use config::{
    ChunkConfig, ChunkKind, ColSpec, ColumnGroupConfig, GridConfig, PaneWidth, SectionConfig,
    SectionKind,
};
pub use model::{max_row_heights, GridModel, RESOURCE_COL_GROUP};

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{HtmlElement, ResizeObserver};

#[cfg(target_arch = "wasm32")]
use crate::dom;
#[cfg(target_arch = "wasm32")]
use crate::geom::{scroll_from_leading_edge, scroll_to_native, Direction, RtlScrollSystem};
#[cfg(target_arch = "wasm32")]
use crate::resizer::PaneResizer;
#[cfg(target_arch = "wasm32")]
use crate::sticky::{probe_rtl_scroll_system, StickyPins};

/// Tolerance when deciding whether a scroll event merely echoes an
/// offset this composer just wrote (browsers clamp and round).
#[cfg(target_arch = "wasm32")]
const ECHO_TOLERANCE_PX: f64 = 1.0;

#[cfg(target_arch = "wasm32")]
struct GridShared {
    model: GridModel,
    direction: Direction,
    system: RtlScrollSystem,
    /// Scroller elements, indexed `[section][chunk]`.
    scrollers: Vec<Vec<Option<HtmlElement>>>,
    /// Chunk elements, indexed `[section][chunk]`.
    chunk_els: Vec<Vec<Option<HtmlElement>>>,
    /// Offsets we just wrote programmatically, keyed by scroller
    /// coordinates; the next matching scroll event is consumed instead of
    /// re-propagated.
    expected_echo: HashMap<(usize, usize), (f64, f64)>,
    destroyed: bool,
}

#[cfg(target_arch = "wasm32")]
impl GridShared {
    fn scroller(&self, section: usize, chunk: usize) -> Option<&HtmlElement> {
        self.scrollers.get(section)?.get(chunk)?.as_ref()
    }

    fn chunk_el(&self, section: usize, chunk: usize) -> Option<&HtmlElement> {
        self.chunk_els.get(section)?.get(chunk)?.as_ref()
    }
}

/// The composed grid, one instance per rendered view.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct ScrollGrid {
    root: HtmlElement,
    state: Rc<RefCell<GridShared>>,
    resizer: Option<PaneResizer>,
    sticky: Option<StickyPins>,
    observer: Option<ResizeObserver>,
    observer_closure: Option<Closure<dyn FnMut(js_sys::Array)>>,
    scroll_closures: Vec<(HtmlElement, Closure<dyn FnMut(web_sys::Event)>)>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ScrollGrid {
    /// Attach to an already-rendered grid subtree.
    ///
    /// `config` is the JS options object (column groups + sections);
    /// `root` is the outer scroll container holding the section elements.
    #[wasm_bindgen(constructor)]
    pub fn new(root: HtmlElement, config: JsValue, is_rtl: bool) -> Result<ScrollGrid, JsValue> {
        console_error_panic_hook::set_once();

        let config: GridConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let model = GridModel::from_config(&config)?;
        let direction = Direction::from_rtl_flag(is_rtl);
        let system = if is_rtl {
            probe_rtl_scroll_system()
        } else {
            RtlScrollSystem::Negative
        };

        // Collect the section/chunk/scroller elements in configured order.
        let section_els = dom::find_elements(&root, ".sg-section");
        let mut chunk_els: Vec<Vec<Option<HtmlElement>>> = Vec::new();
        let mut scrollers: Vec<Vec<Option<HtmlElement>>> = Vec::new();
        for si in 0..model.section_count() {
            let chunks = section_els
                .get(si)
                .map(|section_el| dom::find_elements(section_el, ".sg-chunk"))
                .unwrap_or_default();
            let mut chunk_row = Vec::new();
            let mut scroller_row = Vec::new();
            for ci in 0..model.col_group_count() {
                let chunk_el = chunks.get(ci).cloned();
                let scroller = chunk_el.as_ref().and_then(|el| {
                    el.query_selector(".sg-scroller")
                        .ok()
                        .flatten()
                        .and_then(|n| n.dyn_into::<HtmlElement>().ok())
                });
                chunk_row.push(chunk_el);
                scroller_row.push(scroller);
            }
            chunk_els.push(chunk_row);
            scrollers.push(scroller_row);
        }

        let state = Rc::new(RefCell::new(GridShared {
            model,
            direction,
            system,
            scrollers,
            chunk_els,
            expected_echo: HashMap::new(),
            destroyed: false,
        }));

        let mut grid = ScrollGrid {
            root,
            state,
            resizer: None,
            sticky: None,
            observer: None,
            observer_closure: None,
            scroll_closures: Vec::new(),
        };
        grid.wire_scroll_sync();
        grid.wire_resizer();
        grid.wire_content_observer();
        grid.wire_sticky_sections();

        Self::apply_column_widths(&grid.state);
        Self::sync_section_rows(&grid.state);
        if let Some(sticky) = &grid.sticky {
            sticky.refresh();
        }
        Ok(grid)
    }

    /// Re-measure natural row heights and re-apply all synchronized
    /// state. Idempotent when nothing changed underneath.
    pub fn refresh(&self) {
        Self::apply_column_widths(&self.state);
        Self::sync_section_rows(&self.state);
        if let Some(sticky) = &self.sticky {
            sticky.refresh();
        }
    }

    /// Programmatically scroll every chunk of a column group.
    #[wasm_bindgen(js_name = forceScrollLeft)]
    pub fn force_scroll_left(&self, col_group: usize, offset: f64) -> Result<(), JsValue> {
        let stored = self
            .state
            .borrow_mut()
            .model
            .force_scroll_left(col_group, offset)?;
        Self::apply_group_scroll_left(&self.state, col_group, stored, None);
        Ok(())
    }

    /// Programmatically scroll every chunk of a section.
    #[wasm_bindgen(js_name = forceScrollTop)]
    pub fn force_scroll_top(&self, section: usize, offset: f64) -> Result<(), JsValue> {
        let stored = self
            .state
            .borrow_mut()
            .model
            .force_scroll_top(section, offset)?;
        Self::apply_section_scroll_top(&self.state, section, stored, None);
        Ok(())
    }

    /// Current normalized horizontal offset of a column group.
    #[wasm_bindgen(js_name = scrollLeft)]
    pub fn scroll_left(&self, col_group: usize) -> f64 {
        self.state.borrow().model.scroll_left(col_group)
    }

    /// Vertical offset of the body section, for persisting/restoring
    /// scroll position across layout rebuilds.
    #[wasm_bindgen(js_name = getResourceScroll)]
    pub fn resource_scroll(&self) -> f64 {
        self.state.borrow().model.resource_scroll()
    }

    /// Current data-grid pane width, if concrete.
    #[wasm_bindgen(js_name = getResourceAreaWidth)]
    pub fn resource_area_width(&self) -> Option<f64> {
        self.state.borrow().model.resource_area_width()
    }

    /// Install a new data-grid pane width and re-apply the layout.
    #[wasm_bindgen(js_name = setResourceAreaWidth)]
    pub fn set_resource_area_width(&self, width: f64) -> Result<(), JsValue> {
        self.state
            .borrow_mut()
            .model
            .set_resource_area_width(width)?;
        Self::apply_column_widths(&self.state);
        Self::sync_section_rows(&self.state);
        if let Some(sticky) = &self.sticky {
            sticky.refresh();
        }
        Ok(())
    }

    /// Scoped teardown of scroll wiring, resizer, observer and sticky
    /// engine. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        {
            let mut s = self.state.borrow_mut();
            if s.destroyed {
                return;
            }
            s.destroyed = true;
        }
        for (el, closure) in self.scroll_closures.drain(..) {
            let _ = el
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        }
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.observer_closure = None;
        if let Some(mut resizer) = self.resizer.take() {
            resizer.destroy();
        }
        if let Some(mut sticky) = self.sticky.take() {
            sticky.destroy();
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScrollGrid {
    fn wire_scroll_sync(&mut self) {
        let coords: Vec<(usize, usize)> = {
            let s = self.state.borrow();
            let mut out = Vec::new();
            for ci in 0..s.model.col_group_count() {
                out.extend(s.model.scroll_group_members(ci));
            }
            out
        };

        for (si, ci) in coords {
            let Some(scroller) = self.state.borrow().scroller(si, ci).cloned() else {
                continue;
            };
            let state = Rc::clone(&self.state);
            let scroller_for_closure = scroller.clone();
            let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                Self::handle_chunk_scroll(&state, &scroller_for_closure, si, ci);
            }) as Box<dyn FnMut(web_sys::Event)>);
            let _ = scroller
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            self.scroll_closures.push((scroller, closure));
        }
    }

    /// One chunk scrolled: update the authoritative offsets and move
    /// every other member of the affected groups to match, within this
    /// same pass.
    fn handle_chunk_scroll(
        state: &Rc<RefCell<GridShared>>,
        scroller: &HtmlElement,
        section: usize,
        chunk: usize,
    ) {
        let (left, top, is_echo) = {
            let mut s = state.borrow_mut();
            if s.destroyed {
                return;
            }
            let left = scroll_from_leading_edge(
                dom::scroll_left_f64(scroller),
                f64::from(scroller.scroll_width()),
                f64::from(scroller.client_width()),
                s.direction,
                s.system,
            );
            let top = dom::scroll_top_f64(scroller);

            let is_echo = match s.expected_echo.get(&(section, chunk)) {
                Some(&(el, et))
                    if (el - left).abs() <= ECHO_TOLERANCE_PX
                        && (et - top).abs() <= ECHO_TOLERANCE_PX =>
                {
                    s.expected_echo.remove(&(section, chunk));
                    true
                }
                _ => false,
            };
            if !is_echo {
                let _ = s.model.force_scroll_left(chunk, left);
                let _ = s.model.force_scroll_top(section, top);
            }
            (left, top, is_echo)
        }; // borrow dropped before writing sibling scrollers

        if is_echo {
            return;
        }
        Self::apply_group_scroll_left(state, chunk, left, Some((section, chunk)));
        Self::apply_section_scroll_top(state, section, top, Some((section, chunk)));
    }

    /// Write a column group's horizontal offset to every member scroller
    /// except `skip`, recording the expected echo per write.
    fn apply_group_scroll_left(
        state: &Rc<RefCell<GridShared>>,
        col_group: usize,
        offset: f64,
        skip: Option<(usize, usize)>,
    ) {
        let writes: Vec<(usize, usize, HtmlElement, f64)> = {
            let s = state.borrow();
            if s.destroyed {
                return;
            }
            s.model
                .scroll_group_members(col_group)
                .into_iter()
                .filter(|&coord| Some(coord) != skip)
                .filter_map(|(si, ci)| {
                    let scroller = s.scroller(si, ci)?.clone();
                    let current = scroll_from_leading_edge(
                        dom::scroll_left_f64(&scroller),
                        f64::from(scroller.scroll_width()),
                        f64::from(scroller.client_width()),
                        s.direction,
                        s.system,
                    );
                    if (current - offset).abs() <= ECHO_TOLERANCE_PX {
                        return None; // already in agreement, nothing to move
                    }
                    let native = scroll_to_native(
                        offset,
                        f64::from(scroller.scroll_width()),
                        f64::from(scroller.client_width()),
                        s.direction,
                        s.system,
                    );
                    Some((si, ci, scroller, native))
                })
                .collect()
        };

        for (si, ci, scroller, native) in writes {
            {
                let mut s = state.borrow_mut();
                let top = dom::scroll_top_f64(&scroller);
                s.expected_echo.insert((si, ci), (offset, top));
            }
            scroller.set_scroll_left(native_to_i32(native));
        }
    }

    /// Write a section's vertical offset to every member scroller except
    /// `skip`.
    fn apply_section_scroll_top(
        state: &Rc<RefCell<GridShared>>,
        section: usize,
        offset: f64,
        skip: Option<(usize, usize)>,
    ) {
        let writes: Vec<(usize, usize, HtmlElement)> = {
            let s = state.borrow();
            if s.destroyed {
                return;
            }
            s.model
                .section_members(section)
                .into_iter()
                .map(|ci| (section, ci))
                .filter(|&coord| Some(coord) != skip)
                .filter_map(|(si, ci)| {
                    let scroller = s.scroller(si, ci)?.clone();
                    if (dom::scroll_top_f64(&scroller) - offset).abs() <= ECHO_TOLERANCE_PX {
                        return None; // already in agreement
                    }
                    Some((si, ci, scroller))
                })
                .collect()
        };

        for (si, ci, scroller) in writes {
            {
                let mut s = state.borrow_mut();
                let left = scroll_from_leading_edge(
                    dom::scroll_left_f64(&scroller),
                    f64::from(scroller.scroll_width()),
                    f64::from(scroller.client_width()),
                    s.direction,
                    s.system,
                );
                s.expected_echo.insert((si, ci), (left, offset));
            }
            scroller.set_scroll_top(native_to_i32(offset));
        }
    }

    fn wire_resizer(&mut self) {
        let Some(divider) = dom::find_elements(&self.root, ".sg-divider").into_iter().next()
        else {
            return;
        };
        let direction = self.state.borrow().direction;
        let resizer = PaneResizer::new(divider, direction);

        // Width at drag start: the authoritative value if concrete,
        // otherwise the live rendered width of the data-grid chunk.
        let state = Rc::clone(&self.state);
        let root = self.root.clone();
        resizer.on_drag_start(Rc::new(move || {
            let s = state.borrow();
            let total = dom::bounding_rect(&root).width();
            let start = s
                .model
                .resource_area_width()
                .or_else(|| s.model.configured_resource_width().resolve(total))
                .or_else(|| {
                    s.chunk_el(0, RESOURCE_COL_GROUP)
                        .map(|el| dom::bounding_rect(el).width())
                })
                .unwrap_or(0.0);
            (start, total)
        }));

        let state = Rc::clone(&self.state);
        resizer.on_resize(Rc::new(move |width| {
            {
                let mut s = state.borrow_mut();
                if s.destroyed {
                    return;
                }
                let _ = s.model.set_resource_area_width(width);
            }
            Self::apply_column_widths(&state);
        }));

        self.resizer = Some(resizer);
    }

    fn wire_content_observer(&mut self) {
        let state = Rc::clone(&self.state);
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            Self::sync_section_rows(&state);
        }) as Box<dyn FnMut(js_sys::Array)>);

        let Ok(observer) = ResizeObserver::new(closure.as_ref().unchecked_ref()) else {
            self.observer_closure = Some(closure);
            return;
        };
        {
            let s = self.state.borrow();
            for row in &s.chunk_els {
                for chunk_el in row.iter().flatten() {
                    observer.observe(chunk_el);
                }
            }
        }
        self.observer = Some(observer);
        self.observer_closure = Some(closure);
    }

    fn wire_sticky_sections(&mut self) {
        let (direction, sticky_sections) = {
            let s = self.state.borrow();
            (s.direction, s.model.sticky_sections())
        };
        if sticky_sections.is_empty() {
            return;
        }
        let section_els = dom::find_elements(&self.root, ".sg-section");
        for si in sticky_sections {
            if let Some(el) = section_els.get(si) {
                let _ = el.class_list().add_1("sg-sticky");
            }
        }
        self.sticky = Some(StickyPins::auto(self.root.clone(), direction));
    }

    /// Apply each column group's width to its chunk elements. The
    /// data-grid group follows the authoritative resized width; other
    /// groups use the sum of their configured column widths.
    fn apply_column_widths(state: &Rc<RefCell<GridShared>>) {
        let writes: Vec<(HtmlElement, f64)> = {
            let s = state.borrow();
            if s.destroyed {
                return;
            }
            let mut out = Vec::new();
            for ci in 0..s.model.col_group_count() {
                let width = if ci == RESOURCE_COL_GROUP {
                    s.model.resource_area_width()
                } else {
                    let cols = s.model.col_widths(ci);
                    if cols.is_empty() || cols.iter().any(Option::is_none) {
                        None
                    } else {
                        Some(cols.iter().flatten().sum())
                    }
                };
                let Some(width) = width else {
                    continue;
                };
                for row in &s.chunk_els {
                    if let Some(Some(chunk_el)) = row.get(ci) {
                        out.push((chunk_el.clone(), width));
                    }
                }
            }
            out
        }; // borrow dropped before DOM writes

        for (el, width) in writes {
            dom::set_style_px(&el, "width", width);
        }
    }

    /// Measure every synced section's natural row heights and re-apply
    /// the per-row maximum to all of its chunks.
    fn sync_section_rows(state: &Rc<RefCell<GridShared>>) {
        let section_count = {
            let s = state.borrow();
            if s.destroyed {
                return;
            }
            s.model.section_count()
        };

        for si in 0..section_count {
            if !state.borrow().model.wants_row_height_sync(si) {
                continue;
            }

            // Measure phase: clear previously assigned heights so the
            // natural height is observable again, then record it.
            let chunk_rows: Vec<(usize, Vec<HtmlElement>)> = {
                let s = state.borrow();
                (0..s.model.col_group_count())
                    .filter_map(|ci| {
                        let chunk_el = s.chunk_el(si, ci)?;
                        Some((ci, dom::find_elements(chunk_el, "tr")))
                    })
                    .collect()
            };
            for (ci, rows) in &chunk_rows {
                let heights: Vec<f64> = rows
                    .iter()
                    .map(|row| {
                        dom::clear_style(row, "height");
                        dom::bounding_rect(row).height()
                    })
                    .collect();
                let _ = state.borrow_mut().model.set_natural_heights(si, *ci, heights);
            }

            // Apply phase: every chunk's row takes the section maximum.
            let synced = state.borrow().model.synced_row_heights(si);
            for (_, rows) in &chunk_rows {
                for (row, height) in rows.iter().zip(&synced) {
                    dom::set_style_px(row, "height", *height);
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ScrollGrid {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Scroll offsets are written back through the integer DOM API; round to
/// the nearest pixel.
#[cfg(target_arch = "wasm32")]
#[allow(clippy::cast_possible_truncation)]
fn native_to_i32(value: f64) -> i32 {
    let rounded = value.round();
    if rounded >= f64::from(i32::MAX) {
        i32::MAX
    } else if rounded <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        rounded as i32
    }
}
