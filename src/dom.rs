//! Small web-sys helpers shared by the DOM drivers.
//!
//! Everything here is read-or-write of live DOM state; the arithmetic it
//! feeds lives in the pure `geom` module.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Element, HtmlElement};

use crate::geom::{
    canvas_origin, inner_rect, scroll_from_left_edge, Direction, EdgeInsets, Point, Rect,
    RtlScrollSystem,
};

/// Monotonic-ish timestamp in milliseconds.
pub(crate) fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

pub(crate) fn computed_style(el: &Element) -> Option<CssStyleDeclaration> {
    web_sys::window()
        .and_then(|w| w.get_computed_style(el).ok())
        .flatten()
}

/// Parse a pixel-valued computed style property. Non-numeric values
/// ("auto", empty) read as 0.
pub(crate) fn style_px(style: &CssStyleDeclaration, prop: &str) -> f64 {
    style
        .get_property_value(prop)
        .ok()
        .and_then(|v| v.trim_end_matches("px").trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub(crate) fn bounding_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

fn border_insets(style: &CssStyleDeclaration) -> EdgeInsets {
    EdgeInsets::new(
        style_px(style, "border-left-width"),
        style_px(style, "border-top-width"),
        style_px(style, "border-right-width"),
        style_px(style, "border-bottom-width"),
    )
}

/// Content-box rect of `el` in viewport coordinates, excluding borders
/// and any scrollbar gutter the browser reserved. The vertical scrollbar
/// sits on the trailing edge, so its gutter flips sides under RTL.
pub(crate) fn inner_rect_of(el: &HtmlElement, direction: Direction) -> Rect {
    let border_box = bounding_rect(el);
    let borders = computed_style(el).map(|s| border_insets(&s)).unwrap_or_default();

    let h_gutter = (f64::from(el.offset_width()) - f64::from(el.client_width())
        - borders.left
        - borders.right)
        .max(0.0);
    let v_gutter = (f64::from(el.offset_height()) - f64::from(el.client_height())
        - borders.top
        - borders.bottom)
        .max(0.0);
    let gutters = if direction.is_rtl() {
        EdgeInsets::new(h_gutter, 0.0, 0.0, v_gutter)
    } else {
        EdgeInsets::new(0.0, 0.0, h_gutter, v_gutter)
    };

    inner_rect(border_box, borders, gutters)
}

/// Fractional scrollLeft where the engine provides it; integer fallback
/// otherwise.
pub(crate) fn scroll_left_f64(el: &Element) -> f64 {
    js_sys::Reflect::get(el.as_ref(), &JsValue::from_str("scrollLeft"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(el.scroll_left()))
}

pub(crate) fn scroll_top_f64(el: &Element) -> f64 {
    js_sys::Reflect::get(el.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(el.scroll_top()))
}

/// The scrollable content's top-left in viewport coordinates.
pub(crate) fn canvas_origin_of(
    scroll_el: &HtmlElement,
    direction: Direction,
    system: RtlScrollSystem,
) -> Point {
    let content_box = inner_rect_of(scroll_el, direction);
    let from_left = scroll_from_left_edge(
        scroll_left_f64(scroll_el),
        f64::from(scroll_el.scroll_width()),
        f64::from(scroll_el.client_width()),
        direction,
        system,
    );
    canvas_origin(content_box.origin(), from_left, scroll_top_f64(scroll_el))
}

/// All descendants of `root` matching `selector`, as `HtmlElement`s.
pub(crate) fn find_elements(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let mut out = Vec::new();
    let Ok(nodes) = root.query_selector_all(selector) else {
        return out;
    };
    for i in 0..nodes.length() {
        if let Some(node) = nodes.item(i) {
            if let Ok(el) = node.dyn_into::<HtmlElement>() {
                out.push(el);
            }
        }
    }
    out
}

pub(crate) fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    let _ = el.style().set_property(prop, value);
}

pub(crate) fn set_style_px(el: &HtmlElement, prop: &str, value: f64) {
    set_style(el, prop, &format!("{value}px"));
}

pub(crate) fn clear_style(el: &HtmlElement, prop: &str) {
    let _ = el.style().remove_property(prop);
}
