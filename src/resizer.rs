//! Divider drag handling: live-resizes the data-grid pane.
//!
//! The width math is a pure [`DragSession`]; the wasm glue wires the
//! mouse gesture and feeds deltas through it.

use crate::geom::Direction;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{HtmlElement, MouseEvent};

/// Minimum width either pane may be squeezed to. Wider than any
/// scrollbar gutter, so both panes stay usable.
pub const MIN_PANE_WIDTH: f64 = 30.0;

/// One drag gesture: captured at drag start, consulted on every move.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    start_width: f64,
    total_width: f64,
    direction: Direction,
}

impl DragSession {
    /// Capture the pane's width and the layout's total width at drag
    /// start.
    pub fn new(start_width: f64, total_width: f64, direction: Direction) -> Self {
        Self {
            start_width,
            total_width,
            direction,
        }
    }

    /// New pane width for a horizontal pointer delta. The delta is
    /// sign-flipped under RTL so dragging outward always grows the pane,
    /// then clamped so both panes keep [`MIN_PANE_WIDTH`].
    pub fn width_for_delta(&self, dx: f64) -> f64 {
        let width = self.start_width + self.direction.signed(dx);
        width
            .max(MIN_PANE_WIDTH)
            .min(self.total_width - MIN_PANE_WIDTH)
    }
}

#[cfg(target_arch = "wasm32")]
struct ResizerShared {
    direction: Direction,
    /// Active gesture plus the pointer x it started at.
    session: Option<(DragSession, f64)>,
    on_drag_start: Option<Rc<dyn Fn() -> (f64, f64)>>,
    on_resize: Option<Rc<dyn Fn(f64)>>,
    destroyed: bool,
}

/// Wires the drag gesture onto a divider handle element.
///
/// `mousedown` lands on the handle; `mousemove`/`mouseup` land on the
/// document so the gesture survives leaving the handle. The handler
/// prevents the default drag behavior, so no ambient auto-scroll of the
/// time pane can kick in while resizing.
#[cfg(target_arch = "wasm32")]
pub struct PaneResizer {
    handle_el: HtmlElement,
    state: Rc<RefCell<ResizerShared>>,
    down_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    move_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    up_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
}

#[cfg(target_arch = "wasm32")]
impl PaneResizer {
    pub fn new(handle_el: HtmlElement, direction: Direction) -> Self {
        let state = Rc::new(RefCell::new(ResizerShared {
            direction,
            session: None,
            on_drag_start: None,
            on_resize: None,
            destroyed: false,
        }));

        // Drag start
        let down_closure = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                event.prevent_default();
                let provider = {
                    let s = state.borrow();
                    if s.destroyed {
                        return;
                    }
                    s.on_drag_start.clone()
                };
                let Some(provider) = provider else {
                    return;
                };
                let (start_width, total_width) = provider();
                let mut s = state.borrow_mut();
                let session = DragSession::new(start_width, total_width, s.direction);
                s.session = Some((session, f64::from(event.client_x())));
            }) as Box<dyn FnMut(MouseEvent)>)
        };
        let _ = handle_el
            .add_event_listener_with_callback("mousedown", down_closure.as_ref().unchecked_ref());

        // Drag move
        let move_closure = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                let (width, on_resize) = {
                    let s = state.borrow();
                    let Some((session, start_x)) = s.session else {
                        return;
                    };
                    event.prevent_default();
                    let dx = f64::from(event.client_x()) - start_x;
                    (session.width_for_delta(dx), s.on_resize.clone())
                }; // borrow dropped before invoking user code
                if let Some(callback) = on_resize {
                    callback(width);
                }
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        // Drag end
        let up_closure = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |_event: MouseEvent| {
                state.borrow_mut().session = None;
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        if let Some(document) = handle_el.owner_document() {
            let _ = document.add_event_listener_with_callback(
                "mousemove",
                move_closure.as_ref().unchecked_ref(),
            );
            let _ = document
                .add_event_listener_with_callback("mouseup", up_closure.as_ref().unchecked_ref());
        }

        Self {
            handle_el,
            state,
            down_closure: Some(down_closure),
            move_closure: Some(move_closure),
            up_closure: Some(up_closure),
        }
    }

    /// Provider of `(start_width, total_width)`, read live at drag start
    /// so proportional configured widths resolve against the rendered
    /// layout.
    pub fn on_drag_start(&self, provider: Rc<dyn Fn() -> (f64, f64)>) {
        self.state.borrow_mut().on_drag_start = Some(provider);
    }

    /// Receiver of the clamped width on every drag move.
    pub fn on_resize(&self, callback: Rc<dyn Fn(f64)>) {
        self.state.borrow_mut().on_resize = Some(callback);
    }

    /// Remove all three listeners. Safe to call repeatedly; nothing fires
    /// afterwards.
    pub fn destroy(&mut self) {
        {
            let mut s = self.state.borrow_mut();
            if s.destroyed {
                return;
            }
            s.destroyed = true;
            s.session = None;
            s.on_drag_start = None;
            s.on_resize = None;
        }
        if let Some(closure) = self.down_closure.take() {
            let _ = self.handle_el.remove_event_listener_with_callback(
                "mousedown",
                closure.as_ref().unchecked_ref(),
            );
        }
        if let Some(document) = self.handle_el.owner_document() {
            if let Some(closure) = self.move_closure.take() {
                let _ = document.remove_event_listener_with_callback(
                    "mousemove",
                    closure.as_ref().unchecked_ref(),
                );
            }
            if let Some(closure) = self.up_closure.take() {
                let _ = document.remove_event_listener_with_callback(
                    "mouseup",
                    closure.as_ref().unchecked_ref(),
                );
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for PaneResizer {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_ltr_drag_grows_with_positive_delta() {
        let session = DragSession::new(300.0, 1000.0, Direction::Ltr);
        assert_eq!(session.width_for_delta(50.0), 350.0);
    }

    #[test]
    fn test_rtl_drag_inverts_delta() {
        let session = DragSession::new(300.0, 1000.0, Direction::Rtl);
        assert_eq!(session.width_for_delta(50.0), 250.0);
    }

    #[test]
    fn test_clamps_to_min_both_sides() {
        let session = DragSession::new(300.0, 1000.0, Direction::Ltr);
        assert_eq!(session.width_for_delta(-5000.0), MIN_PANE_WIDTH);
        assert_eq!(session.width_for_delta(5000.0), 1000.0 - MIN_PANE_WIDTH);
    }
}
