//! Geometry utilities for the scroll/layout engines.
//!
//! This module handles:
//! - Rectangle translation between viewport and canvas coordinate frames
//! - Content-box ("inner rect") computation excluding borders and
//!   scrollbar gutters
//! - Directionality-agnostic scroll-offset normalization

mod direction;
mod rect;

pub use direction::{
    canvas_origin, scroll_from_leading_edge, scroll_from_left_edge, scroll_to_native, Direction,
    ResolvedAlign, RtlScrollSystem, TextAlign,
};
pub use rect::{inner_rect, EdgeInsets, Point, Rect};
