//! Scroll listener with coalesced "scroll end" notification.
//!
//! Wraps one scrollable container and emits a `scrolling` signal per
//! scroll event plus a single `scroll end` once scrolling has been idle
//! for [`SCROLL_SETTLE_DELAY_MS`]. The debounce is a rescheduling timeout:
//! when the timer fires while scrolling is still ongoing, it re-arms
//! itself instead of emitting.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::dom::now_ms;

/// Delay (ms) after scroll stops before the coalesced "scroll end" fires.
pub const SCROLL_SETTLE_DELAY_MS: i32 = 100;

/// Pure debounce bookkeeping: records when scrolling last happened and
/// answers whether the settle window has elapsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettleGate {
    last_scroll_ms: f64,
}

impl SettleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll event at `now_ms`.
    pub fn note_scroll(&mut self, now_ms: f64) {
        self.last_scroll_ms = now_ms;
    }

    /// True once the settle window has elapsed since the last recorded
    /// scroll.
    pub fn is_settled(&self, now_ms: f64) -> bool {
        now_ms - self.last_scroll_ms >= f64::from(SCROLL_SETTLE_DELAY_MS)
    }
}

#[cfg(target_arch = "wasm32")]
struct ListenerShared {
    gate: SettleGate,
    settle_timer: Option<i32>,
    settle_closure: Option<Closure<dyn FnMut()>>,
    on_scroll: Option<Rc<dyn Fn()>>,
    on_scroll_end: Option<Rc<dyn Fn()>>,
    destroyed: bool,
}

/// Listens to one scrollable container. Self-contained: any number of
/// listeners can be attached to different containers independently.
#[cfg(target_arch = "wasm32")]
pub struct ScrollListener {
    el: web_sys::Element,
    state: Rc<RefCell<ListenerShared>>,
    scroll_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

#[cfg(target_arch = "wasm32")]
impl ScrollListener {
    /// Attach to `el`'s scroll events.
    pub fn new(el: web_sys::Element) -> Self {
        let state = Rc::new(RefCell::new(ListenerShared {
            gate: SettleGate::new(),
            settle_timer: None,
            settle_closure: None,
            on_scroll: None,
            on_scroll_end: None,
            destroyed: false,
        }));

        let state_clone = Rc::clone(&state);
        let scroll_closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let on_scroll = {
                let mut s = state_clone.borrow_mut();
                if s.destroyed {
                    return;
                }
                s.gate.note_scroll(now_ms());
                s.on_scroll.clone()
            }; // borrow dropped before invoking user code
            if let Some(callback) = on_scroll {
                callback();
            }
            Self::schedule_settle_timeout(&state_clone);
        }) as Box<dyn FnMut(web_sys::Event)>);

        let _ = el
            .add_event_listener_with_callback("scroll", scroll_closure.as_ref().unchecked_ref());

        Self {
            el,
            state,
            scroll_closure: Some(scroll_closure),
        }
    }

    /// Register the per-event scrolling callback.
    pub fn on_scroll(&self, callback: Rc<dyn Fn()>) {
        self.state.borrow_mut().on_scroll = Some(callback);
    }

    /// Register the coalesced scroll-end callback.
    pub fn on_scroll_end(&self, callback: Rc<dyn Fn()>) {
        self.state.borrow_mut().on_scroll_end = Some(callback);
    }

    fn schedule_settle_timeout(state: &Rc<RefCell<ListenerShared>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.destroyed {
            return;
        }
        // Cancel any existing timer
        if let Some(timer_id) = s.settle_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        if s.settle_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    Self::handle_settle(&state);
                }
            }) as Box<dyn FnMut()>);
            s.settle_closure = Some(closure);
        }
        let Some(callback) = s.settle_closure.as_ref() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            SCROLL_SETTLE_DELAY_MS,
        ) {
            Ok(id) => s.settle_timer = Some(id),
            Err(_) => s.settle_timer = None,
        }
    }

    fn handle_settle(state: &Rc<RefCell<ListenerShared>>) {
        let on_scroll_end = {
            let mut s = state.borrow_mut();
            s.settle_timer = None;
            if s.destroyed {
                return;
            }
            // Check if scroll is still ongoing
            if !s.gate.is_settled(now_ms()) {
                drop(s);
                Self::schedule_settle_timeout(state);
                return;
            }
            s.on_scroll_end.clone()
        };
        if let Some(callback) = on_scroll_end {
            callback();
        }
    }

    /// Release the DOM listener and cancel any pending settle timer.
    /// After this returns, no callback fires again. Safe to call more
    /// than once.
    pub fn destroy(&mut self) {
        {
            let mut s = self.state.borrow_mut();
            if s.destroyed {
                return;
            }
            s.destroyed = true;
            s.on_scroll = None;
            s.on_scroll_end = None;
            if let Some(timer_id) = s.settle_timer.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(timer_id);
                }
            }
            s.settle_closure = None;
        }
        if let Some(closure) = self.scroll_closure.take() {
            let _ = self
                .el
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ScrollListener {
    fn drop(&mut self) {
        self.destroy();
    }
}
