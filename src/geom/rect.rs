//! Rectangle primitives shared by the sticky engine and the grid composer.
//!
//! All geometry in this crate lives in one of two frames: viewport
//! coordinates (what `getBoundingClientRect` reports) and canvas
//! coordinates (origin at the scrollable content's top-left, invariant
//! under scrolling). Conversion between the two is a plain translation.

/// A point in either coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub left: f64,
    pub top: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// An axis-aligned rectangle stored by its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Create a rectangle from its four edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Return this rectangle shifted by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// Per-edge thicknesses, used for borders and scrollbar gutters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl EdgeInsets {
    /// Create insets from the four edge thicknesses.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Compute an element's content-box rectangle from its border-box rect.
///
/// Strips the border widths first and then any scrollbar gutter the
/// browser reserved inside the borders. Which side the vertical gutter
/// sits on is directionality-dependent, so the caller supplies the
/// gutters already attributed to their edges.
pub fn inner_rect(border_box: Rect, borders: EdgeInsets, gutters: EdgeInsets) -> Rect {
    Rect {
        left: border_box.left + borders.left + gutters.left,
        top: border_box.top + borders.top + gutters.top,
        right: border_box.right - borders.right - gutters.right,
        bottom: border_box.bottom - borders.bottom - gutters.bottom,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_size() {
        let r = Rect::from_size(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right, 110.0);
        assert_eq!(r.bottom, 70.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
    }

    #[test]
    fn test_translate() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).translate(5.0, -2.0);
        assert_eq!(r, Rect::new(5.0, -2.0, 15.0, 8.0));
    }

    #[test]
    fn test_inner_rect_strips_borders_and_gutter() {
        let border_box = Rect::from_size(0.0, 0.0, 200.0, 100.0);
        let borders = EdgeInsets::new(1.0, 1.0, 1.0, 1.0);
        // Vertical scrollbar on the right, horizontal at the bottom.
        let gutters = EdgeInsets::new(0.0, 0.0, 15.0, 15.0);

        let inner = inner_rect(border_box, borders, gutters);
        assert_eq!(inner, Rect::new(1.0, 1.0, 184.0, 84.0));
        assert_eq!(inner.width(), 183.0);
    }

    #[test]
    fn test_inner_rect_rtl_gutter_on_left() {
        let border_box = Rect::from_size(0.0, 0.0, 200.0, 100.0);
        let borders = EdgeInsets::default();
        let gutters = EdgeInsets::new(15.0, 0.0, 0.0, 0.0);

        let inner = inner_rect(border_box, borders, gutters);
        assert_eq!(inner.left, 15.0);
        assert_eq!(inner.right, 200.0);
    }
}
