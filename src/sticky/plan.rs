//! Pure planning core for sticky positioning.
//!
//! Everything here operates on geometry snapshots in canvas coordinates
//! (origin at the scrollable content's top-left) and is total: given any
//! snapshot, a plan comes out. The DOM driver in the parent module is
//! responsible for taking ONE consistent snapshot per pass and applying
//! the resulting plan, so no interleaved re-measurement can occur.

use crate::geom::{Direction, Rect, ResolvedAlign};

/// Platform capabilities relevant to pinning, probed once by the embedder
/// and injected at construction. Keeping this an explicit value (instead
/// of an ambient singleton) lets both code paths be tested
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickyCaps {
    /// The platform supports native position pinning at all.
    pub native_sticky: bool,
    /// The platform's native pinning mis-renders under RTL and must be
    /// avoided for that pairing specifically.
    pub native_sticky_broken_rtl: bool,
}

/// Which positioning scheme the engine runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Let the platform track scrolling; assign pin offsets once per
    /// refresh.
    Native,
    /// Emulate pinning with relative offsets recomputed on scroll settle.
    Emulated,
}

impl PinMode {
    /// Mode selection: native pinning is used only when supported AND the
    /// current directionality is not a known-broken pairing.
    pub fn select(caps: StickyCaps, direction: Direction) -> Self {
        let broken_pairing = caps.native_sticky_broken_rtl && direction.is_rtl();
        if caps.native_sticky && !broken_pairing {
            Self::Native
        } else {
            Self::Emulated
        }
    }
}

/// Engine lifecycle. `Attached` is entered at construction; `Destroyed`
/// is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Attached,
    Destroyed,
}

/// Per-element geometry snapshot, recomputed on every refresh and never
/// persisted.
#[derive(Debug, Clone, Copy)]
pub struct ElementGeom {
    /// Containing block's content box, in canvas coordinates.
    pub parent_bound: Rect,
    /// The element's un-pinned rectangle in canvas coordinates, with any
    /// already-applied offset subtracted out so repeated refreshes don't
    /// compound. Absent under native pinning, where the platform owns the
    /// offset.
    pub natural_bound: Option<Rect>,
    pub width: f64,
    pub height: f64,
    /// Alignment with `start`/`end` already resolved against
    /// directionality.
    pub align: ResolvedAlign,
}

/// The currently visible window of the canvas, in canvas coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ViewportWindow {
    /// Vertical scroll offset.
    pub top: f64,
    /// Normalized horizontal scroll offset (left-origin).
    pub left: f64,
    /// Inner width of the scroller.
    pub width: f64,
}

impl ViewportWindow {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Computed pin target for one element, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub left: f64,
    pub top: f64,
}

/// Offset from an element's natural placement. Applied as a relative
/// position so it composes with layout reflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeShift {
    pub left: f64,
    pub top: f64,
}

impl RelativeShift {
    /// The mirrored `right` assignment that keeps the shift correct when
    /// the containing block lays out right-to-left.
    pub fn right(&self) -> f64 {
        -self.left
    }
}

/// One-shot native pin offsets for an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeAssignment {
    pub left: f64,
    pub right: f64,
    pub top: f64,
}

/// A full repositioning pass, one entry per marked element, in input
/// order. Elements are independent of each other.
#[derive(Debug, Clone, PartialEq)]
pub enum PinPlan {
    Relative(Vec<RelativeShift>),
    Native(Vec<NativeAssignment>),
}

/// Compute where each element wants to be pinned for the current
/// viewport window.
///
/// Horizontal placement follows the element's resolved alignment and is
/// clamped into the containing block; an element wider than its parent
/// degrades to the parent's left edge. Vertical placement pins to the
/// viewport top but never above the element's natural position and never
/// past the bottom of its containing block.
pub fn compute_destinations(geoms: &[ElementGeom], viewport: &ViewportWindow) -> Vec<Destination> {
    geoms
        .iter()
        .map(|geom| {
            let desired_left = match geom.align {
                ResolvedAlign::Left => viewport.left,
                ResolvedAlign::Right => viewport.right() - geom.width,
                ResolvedAlign::Center => {
                    (viewport.left + viewport.right()) / 2.0 - geom.width / 2.0
                }
            };
            let left = desired_left
                .min(geom.parent_bound.right - geom.width)
                .max(geom.parent_bound.left);

            let natural_top = geom
                .natural_bound
                .map_or(geom.parent_bound.top, |natural| natural.top);
            let top = viewport
                .top
                .min(geom.parent_bound.bottom - geom.height)
                .max(natural_top);

            Destination { left, top }
        })
        .collect()
}

/// Turn destinations into offsets relative to each element's natural
/// placement.
pub fn relative_shifts(geoms: &[ElementGeom], destinations: &[Destination]) -> Vec<RelativeShift> {
    geoms
        .iter()
        .zip(destinations)
        .map(|(geom, dest)| match geom.natural_bound {
            Some(natural) => RelativeShift {
                left: dest.left - natural.left,
                top: dest.top - natural.top,
            },
            // No natural bound means the platform already pins this
            // element; leave it where it is.
            None => RelativeShift {
                left: 0.0,
                top: 0.0,
            },
        })
        .collect()
}

/// Native-mode assignments: zero offset on the leading edge, except that
/// centering within a scrolling ancestor is not expressible declaratively
/// and gets a manually computed offset on both edges.
pub fn native_assignments(geoms: &[ElementGeom], viewport_width: f64) -> Vec<NativeAssignment> {
    geoms
        .iter()
        .map(|geom| {
            let inset = if geom.align == ResolvedAlign::Center {
                (viewport_width - geom.width) / 2.0
            } else {
                0.0
            };
            NativeAssignment {
                left: inset,
                right: inset,
                top: 0.0,
            }
        })
        .collect()
}

/// Mode + lifecycle state machine for one sticky engine instance.
#[derive(Debug, Clone, Copy)]
pub struct PinEngine {
    mode: PinMode,
    phase: EnginePhase,
}

impl PinEngine {
    pub fn new(direction: Direction, caps: StickyCaps) -> Self {
        Self {
            mode: PinMode::select(caps, direction),
            phase: EnginePhase::Attached,
        }
    }

    pub fn mode(&self) -> PinMode {
        self.mode
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Emulated mode recomputes on scroll settle; native mode never needs
    /// a scroll listener.
    pub fn needs_scroll_listener(&self) -> bool {
        self.mode == PinMode::Emulated
    }

    /// Produce the repositioning plan for one refresh pass, or `None`
    /// once destroyed.
    pub fn plan(&self, geoms: &[ElementGeom], viewport: &ViewportWindow) -> Option<PinPlan> {
        if self.phase == EnginePhase::Destroyed {
            return None;
        }
        let plan = match self.mode {
            PinMode::Emulated => {
                let destinations = compute_destinations(geoms, viewport);
                PinPlan::Relative(relative_shifts(geoms, &destinations))
            }
            PinMode::Native => PinPlan::Native(native_assignments(geoms, viewport.width)),
        };
        Some(plan)
    }

    /// One-way transition; safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.phase = EnginePhase::Destroyed;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn geom(parent: Rect, natural: Rect, align: ResolvedAlign) -> ElementGeom {
        ElementGeom {
            parent_bound: parent,
            natural_bound: Some(natural),
            width: natural.width(),
            height: natural.height(),
            align,
        }
    }

    #[test]
    fn test_left_aligned_tracks_viewport_left() {
        let geoms = [geom(
            Rect::from_size(0.0, 0.0, 1000.0, 400.0),
            Rect::from_size(0.0, 0.0, 100.0, 20.0),
            ResolvedAlign::Left,
        )];
        let viewport = ViewportWindow {
            top: 0.0,
            left: 250.0,
            width: 500.0,
        };
        let dests = compute_destinations(&geoms, &viewport);
        assert_eq!(dests[0].left, 250.0);
    }

    #[test]
    fn test_parent_narrower_than_element_degrades_to_parent_left() {
        let geoms = [geom(
            Rect::from_size(10.0, 0.0, 50.0, 400.0),
            Rect::from_size(10.0, 0.0, 80.0, 20.0),
            ResolvedAlign::Left,
        )];
        let viewport = ViewportWindow {
            top: 0.0,
            left: 0.0,
            width: 500.0,
        };
        let dests = compute_destinations(&geoms, &viewport);
        assert_eq!(dests[0].left, 10.0);
    }

    #[test]
    fn test_top_never_above_natural_position() {
        let geoms = [geom(
            Rect::from_size(0.0, 0.0, 1000.0, 400.0),
            Rect::from_size(0.0, 120.0, 100.0, 20.0),
            ResolvedAlign::Left,
        )];
        // Viewport is above where the element naturally sits.
        let viewport = ViewportWindow {
            top: 40.0,
            left: 0.0,
            width: 500.0,
        };
        let dests = compute_destinations(&geoms, &viewport);
        assert_eq!(dests[0].top, 120.0);
    }

    #[test]
    fn test_mode_selection_matrix() {
        let both = StickyCaps {
            native_sticky: true,
            native_sticky_broken_rtl: true,
        };
        assert_eq!(PinMode::select(both, Direction::Ltr), PinMode::Native);
        assert_eq!(PinMode::select(both, Direction::Rtl), PinMode::Emulated);

        let none = StickyCaps::default();
        assert_eq!(PinMode::select(none, Direction::Ltr), PinMode::Emulated);

        let healthy = StickyCaps {
            native_sticky: true,
            native_sticky_broken_rtl: false,
        };
        assert_eq!(PinMode::select(healthy, Direction::Rtl), PinMode::Native);
    }

    #[test]
    fn test_destroyed_engine_plans_nothing() {
        let mut engine = PinEngine::new(Direction::Ltr, StickyCaps::default());
        let viewport = ViewportWindow {
            top: 0.0,
            left: 0.0,
            width: 500.0,
        };
        assert!(engine.plan(&[], &viewport).is_some());
        engine.destroy();
        engine.destroy(); // repeated teardown is safe
        assert!(engine.plan(&[], &viewport).is_none());
    }
}
