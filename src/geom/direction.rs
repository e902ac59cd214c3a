//! Directionality-aware coordinate helpers.
//!
//! Every left-to-right / right-to-left distinction in the crate funnels
//! through this module: signed drag deltas, `start`/`end` text-alignment
//! resolution, and normalization of the browser's horizontal scroll
//! offset. Downstream code works exclusively in normalized distances and
//! never re-derives the inversion.

use super::rect::Point;

/// Reading directionality of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Build from the conventional `isRtl` flag handed over by the host.
    pub fn from_rtl_flag(is_rtl: bool) -> Self {
        if is_rtl {
            Self::Rtl
        } else {
            Self::Ltr
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// Flip a horizontal delta so that positive always means "toward the
    /// trailing edge" (rightward in LTR, leftward in RTL).
    pub fn signed(self, dx: f64) -> f64 {
        match self {
            Self::Ltr => dx,
            Self::Rtl => -dx,
        }
    }
}

/// Raw CSS text alignment as reported by computed style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
    Center,
    Start,
    End,
}

impl TextAlign {
    /// Parse a computed `text-align` value. Unknown values behave like the
    /// CSS initial value `start`.
    pub fn from_css(value: &str) -> Self {
        match value {
            "left" => Self::Left,
            "right" => Self::Right,
            "center" => Self::Center,
            "end" => Self::End,
            _ => Self::Start,
        }
    }

    /// Resolve `start`/`end` against directionality. Direct values pass
    /// through.
    pub fn resolve(self, direction: Direction) -> ResolvedAlign {
        match self {
            Self::Left => ResolvedAlign::Left,
            Self::Right => ResolvedAlign::Right,
            Self::Center => ResolvedAlign::Center,
            Self::Start => {
                if direction.is_rtl() {
                    ResolvedAlign::Right
                } else {
                    ResolvedAlign::Left
                }
            }
            Self::End => {
                if direction.is_rtl() {
                    ResolvedAlign::Left
                } else {
                    ResolvedAlign::Right
                }
            }
        }
    }
}

/// Alignment with directionality already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAlign {
    Left,
    Right,
    Center,
}

/// How the platform reports `scrollLeft` when the container is RTL.
///
/// Browsers never converged on one convention, so the value at the start
/// position (content's trailing edge visible) and the sign of movement
/// differ per engine. The embedder probes this once and injects it; all
/// internal math uses normalized distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtlScrollSystem {
    /// 0 at the start position, going negative as the user scrolls.
    Negative,
    /// 0 at the start position, going positive as the user scrolls.
    Reverse,
    /// 0 at the leftmost position, `max` at the start position.
    Positive,
}

/// Normalized scroll distance from the leading edge.
///
/// The leading edge is the left edge in LTR and the right edge in RTL.
/// The result is always in `[0, scroll_width - client_width]` for
/// in-range raw values, with 0 meaning "at the start position".
pub fn scroll_from_leading_edge(
    raw: f64,
    scroll_width: f64,
    client_width: f64,
    direction: Direction,
    system: RtlScrollSystem,
) -> f64 {
    match direction {
        Direction::Ltr => raw,
        Direction::Rtl => match system {
            RtlScrollSystem::Negative => -raw,
            RtlScrollSystem::Reverse => raw,
            RtlScrollSystem::Positive => max_scroll(scroll_width, client_width) - raw,
        },
    }
}

/// Convert a normalized leading-edge distance back into the raw
/// `scrollLeft` value the platform expects. Inverse of
/// [`scroll_from_leading_edge`].
pub fn scroll_to_native(
    distance: f64,
    scroll_width: f64,
    client_width: f64,
    direction: Direction,
    system: RtlScrollSystem,
) -> f64 {
    match direction {
        Direction::Ltr => distance,
        Direction::Rtl => match system {
            RtlScrollSystem::Negative => -distance,
            RtlScrollSystem::Reverse => distance,
            RtlScrollSystem::Positive => max_scroll(scroll_width, client_width) - distance,
        },
    }
}

/// Distance the content's LEFT edge has been scrolled past the viewport's
/// left edge, regardless of directionality. This is the offset used for
/// canvas-origin math, where the frame is always left-origin.
pub fn scroll_from_left_edge(
    raw: f64,
    scroll_width: f64,
    client_width: f64,
    direction: Direction,
    system: RtlScrollSystem,
) -> f64 {
    let leading = scroll_from_leading_edge(raw, scroll_width, client_width, direction, system);
    match direction {
        Direction::Ltr => leading,
        Direction::Rtl => max_scroll(scroll_width, client_width) - leading,
    }
}

/// Canvas origin: the scrollable content's top-left in viewport
/// coordinates. Invariant under scrolling, because the scroll offsets are
/// subtracted back out.
pub fn canvas_origin(content_box_origin: Point, scroll_from_left: f64, scroll_top: f64) -> Point {
    Point::new(
        content_box_origin.left - scroll_from_left,
        content_box_origin.top - scroll_top,
    )
}

fn max_scroll(scroll_width: f64, client_width: f64) -> f64 {
    (scroll_width - client_width).max(0.0)
}
