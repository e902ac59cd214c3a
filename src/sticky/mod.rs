//! Sticky positioning engine.
//!
//! Keeps marked elements visually pinned inside a scrolling viewport.
//! Useful beyond native position pinning because some platforms lack it
//! entirely, one mis-renders it under RTL, and none of them can center an
//! element against a scrolling ancestor declaratively.
//!
//! The planning math is pure ([`plan`]); the driver here only gathers one
//! geometry snapshot per pass and applies the resulting offsets.

mod plan;

pub use plan::{
    compute_destinations, native_assignments, relative_shifts, Destination, ElementGeom,
    EnginePhase, NativeAssignment, PinEngine, PinMode, PinPlan, RelativeShift, StickyCaps,
    ViewportWindow,
};

/// Marker class other layers put on elements the engine must track.
pub const STICKY_SELECTOR: &str = ".sg-sticky";

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, Element, HtmlElement};

#[cfg(target_arch = "wasm32")]
use crate::dom;
#[cfg(target_arch = "wasm32")]
use crate::geom::{scroll_from_left_edge, Direction, RtlScrollSystem, TextAlign};
#[cfg(target_arch = "wasm32")]
use crate::listener::ScrollListener;

#[cfg(target_arch = "wasm32")]
struct PinShared {
    engine: PinEngine,
    direction: Direction,
    system: RtlScrollSystem,
}

/// DOM driver: one instance per scroll container.
///
/// In emulated mode it subscribes to the container's scroll-end signal
/// and repositions on every settle; in native mode it assigns pin offsets
/// once per [`StickyPins::refresh`] and lets the platform track
/// scrolling.
#[cfg(target_arch = "wasm32")]
pub struct StickyPins {
    scroll_el: HtmlElement,
    state: Rc<RefCell<PinShared>>,
    listener: Option<ScrollListener>,
}

#[cfg(target_arch = "wasm32")]
impl StickyPins {
    /// Construct against one scroll container with explicit capabilities.
    pub fn new(
        scroll_el: HtmlElement,
        direction: Direction,
        caps: StickyCaps,
        system: RtlScrollSystem,
    ) -> Self {
        let engine = PinEngine::new(direction, caps);
        let state = Rc::new(RefCell::new(PinShared {
            engine,
            direction,
            system,
        }));

        let listener = if engine.needs_scroll_listener() {
            let l = ScrollListener::new(Element::from(scroll_el.clone()));
            let state_clone = Rc::clone(&state);
            let el_clone = scroll_el.clone();
            l.on_scroll_end(Rc::new(move || {
                Self::refresh_internal(&el_clone, &state_clone);
            }));
            Some(l)
        } else {
            None
        };

        Self {
            scroll_el,
            state,
            listener,
        }
    }

    /// Construct with capabilities probed from the live document.
    pub fn auto(scroll_el: HtmlElement, direction: Direction) -> Self {
        let caps = scroll_el
            .owner_document()
            .map(|doc| probe_caps(&doc))
            .unwrap_or_default();
        let system = probe_rtl_scroll_system();
        Self::new(scroll_el, direction, caps, system)
    }

    /// Recompute and reposition all currently marked elements.
    pub fn refresh(&self) {
        Self::refresh_internal(&self.scroll_el, &self.state);
    }

    fn refresh_internal(scroll_el: &HtmlElement, state: &Rc<RefCell<PinShared>>) {
        let (engine, direction, system) = {
            let s = state.borrow();
            (s.engine, s.direction, s.system)
        }; // borrow dropped before any DOM access

        if engine.phase() == EnginePhase::Destroyed {
            return;
        }

        let els = dom::find_elements(scroll_el, STICKY_SELECTOR);

        // One consistent snapshot: every read happens before any write.
        let origin = dom::canvas_origin_of(scroll_el, direction, system);
        let geoms = query_el_geoms(&els, origin.left, origin.top, direction);
        let viewport = ViewportWindow {
            top: dom::scroll_top_f64(scroll_el),
            left: scroll_from_left_edge(
                dom::scroll_left_f64(scroll_el),
                f64::from(scroll_el.scroll_width()),
                f64::from(scroll_el.client_width()),
                direction,
                system,
            ),
            width: f64::from(scroll_el.client_width()),
        };

        let Some(plan) = engine.plan(&geoms, &viewport) else {
            return;
        };
        match plan {
            PinPlan::Relative(shifts) => apply_relative(&els, &shifts),
            PinPlan::Native(assignments) => apply_native(&els, &assignments),
        }
    }

    /// Scoped teardown: releases the scroll listener and inertizes the
    /// engine. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.state.borrow_mut().engine.destroy();
        if let Some(mut listener) = self.listener.take() {
            listener.destroy();
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for StickyPins {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(target_arch = "wasm32")]
fn query_el_geoms(
    els: &[HtmlElement],
    origin_left: f64,
    origin_top: f64,
    direction: Direction,
) -> Vec<ElementGeom> {
    els.iter()
        .map(|el| {
            let parent = el.parent_element().and_then(|p| p.dyn_ref::<HtmlElement>().cloned());
            let parent = parent.unwrap_or_else(|| el.clone());

            let parent_bound =
                dom::inner_rect_of(&parent, direction).translate(-origin_left, -origin_top);

            let el_rect = dom::bounding_rect(el);
            let styles = dom::computed_style(el);

            // Alignment is asked of the parent: the element itself is the
            // thing being aligned within it.
            let align = dom::computed_style(&parent)
                .and_then(|s| s.get_property_value("text-align").ok())
                .map_or(TextAlign::Start, |v| TextAlign::from_css(&v))
                .resolve(direction);

            let is_native = styles
                .as_ref()
                .and_then(|s| s.get_property_value("position").ok())
                .is_some_and(|p| p.contains("sticky"));

            let natural_bound = if is_native {
                None
            } else {
                // Subtract any offset already applied by a previous pass
                // so refreshes don't compound.
                let applied_left = styles.as_ref().map_or(0.0, |s| dom::style_px(s, "left"));
                let applied_top = styles.as_ref().map_or(0.0, |s| dom::style_px(s, "top"));
                Some(el_rect.translate(-origin_left - applied_left, -origin_top - applied_top))
            };

            ElementGeom {
                parent_bound,
                natural_bound,
                width: el_rect.width(),
                height: el_rect.height(),
                align,
            }
        })
        .collect()
}

#[cfg(target_arch = "wasm32")]
fn apply_relative(els: &[HtmlElement], shifts: &[RelativeShift]) {
    for (el, shift) in els.iter().zip(shifts) {
        dom::set_style(el, "position", "relative");
        dom::set_style_px(el, "left", shift.left);
        dom::set_style_px(el, "right", shift.right());
        dom::set_style_px(el, "top", shift.top);
    }
}

#[cfg(target_arch = "wasm32")]
fn apply_native(els: &[HtmlElement], assignments: &[NativeAssignment]) {
    for (el, assignment) in els.iter().zip(assignments) {
        dom::set_style(el, "position", "sticky");
        dom::set_style_px(el, "left", assignment.left);
        dom::set_style_px(el, "right", assignment.right);
        dom::set_style_px(el, "top", assignment.top);
    }
}

/// Probe whether the platform honors native position pinning, and
/// whether the known-broken RTL pairing applies.
#[cfg(target_arch = "wasm32")]
pub fn probe_caps(document: &Document) -> StickyCaps {
    let native_sticky = document
        .create_element("div")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map_or(false, |el| {
            let style = el.style();
            let _ = style.set_property("position", "-webkit-sticky");
            let _ = style.set_property("position", "sticky");
            style
                .get_property_value("position")
                .map_or(false, |v| v.contains("sticky"))
        });

    let native_sticky_broken_rtl = web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .is_some_and(|ua| ua.contains("Edge"));

    StickyCaps {
        native_sticky,
        native_sticky_broken_rtl,
    }
}

/// Probe which RTL scrollLeft convention the platform uses, with a
/// throwaway off-screen scroller.
#[cfg(target_arch = "wasm32")]
pub fn probe_rtl_scroll_system() -> RtlScrollSystem {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return RtlScrollSystem::Negative;
    };
    let Some(body) = document.body() else {
        return RtlScrollSystem::Negative;
    };
    let Some(outer) = document
        .create_element("div")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return RtlScrollSystem::Negative;
    };
    let style = outer.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("top", "-1000px");
    let _ = style.set_property("width", "100px");
    let _ = style.set_property("overflow", "scroll");
    let _ = style.set_property("direction", "rtl");
    outer.set_inner_html("<div style=\"width:200px\"></div>");
    let _ = body.append_child(&outer);

    let system = if outer.scroll_left() > 0 {
        RtlScrollSystem::Positive
    } else {
        outer.set_scroll_left(1);
        if outer.scroll_left() > 0 {
            RtlScrollSystem::Reverse
        } else {
            RtlScrollSystem::Negative
        }
    };

    if let Some(parent) = outer.parent_node() {
        let _ = parent.remove_child(&outer);
    }
    system
}
