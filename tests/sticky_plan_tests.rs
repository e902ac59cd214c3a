//! Sticky positioning plan tests
//!
//! Exercises destination computation, clamping against the containing
//! block and the natural position, relative-offset derivation, native
//! assignments, and the engine lifecycle.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use scrollgrid::geom::{Direction, Rect, ResolvedAlign};
use scrollgrid::sticky::{
    compute_destinations, native_assignments, relative_shifts, ElementGeom, PinEngine, PinMode,
    PinPlan, StickyCaps, ViewportWindow,
};

/// Containing block spanning the full canvas used by most tests.
fn wide_parent() -> Rect {
    Rect::from_size(0.0, 0.0, 1000.0, 400.0)
}

fn element(parent: Rect, natural: Rect, align: ResolvedAlign) -> ElementGeom {
    ElementGeom {
        parent_bound: parent,
        natural_bound: Some(natural),
        width: natural.width(),
        height: natural.height(),
        align,
    }
}

fn viewport(top: f64, left: f64, width: f64) -> ViewportWindow {
    ViewportWindow { top, left, width }
}

// =============================================================================
// DESTINATION TESTS
// =============================================================================

#[test]
fn test_centered_element_in_full_viewport() {
    // Container 1000px wide, element 100px, centered, viewport fully
    // visible with no scroll: midpoint minus half width.
    let geoms = [element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 20.0),
        ResolvedAlign::Center,
    )];
    let dests = compute_destinations(&geoms, &viewport(0.0, 0.0, 1000.0));
    assert_eq!(dests[0].left, 450.0);
    assert!(dests[0].left >= 0.0 && dests[0].left <= 900.0);
}

#[test]
fn test_right_aligned_tracks_viewport_right() {
    let geoms = [element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 20.0),
        ResolvedAlign::Right,
    )];
    let dests = compute_destinations(&geoms, &viewport(0.0, 200.0, 500.0));
    // viewport right = 700; element right edge hugs it
    assert_eq!(dests[0].left, 600.0);
}

#[test]
fn test_left_clamped_at_parent_right_edge() {
    // Scrolled so far that the viewport-left exceeds what the parent can
    // contain.
    let geoms = [element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 20.0),
        ResolvedAlign::Left,
    )];
    let dests = compute_destinations(&geoms, &viewport(0.0, 950.0, 500.0));
    assert_eq!(dests[0].left, 900.0); // parent.right - width
}

#[test]
fn test_destinations_stay_in_bounds_across_scroll_range() {
    let parent = wide_parent();
    let natural = Rect::from_size(40.0, 60.0, 120.0, 24.0);
    for align in [
        ResolvedAlign::Left,
        ResolvedAlign::Right,
        ResolvedAlign::Center,
    ] {
        let geoms = [element(parent, natural, align)];
        let mut scroll_left = 0.0;
        while scroll_left <= 600.0 {
            let mut scroll_top = 0.0;
            while scroll_top <= 500.0 {
                let dests = compute_destinations(&geoms, &viewport(scroll_top, scroll_left, 400.0));
                let d = dests[0];
                assert!(
                    d.left >= parent.left && d.left <= parent.right - 120.0,
                    "left {} out of bounds at scroll ({scroll_left}, {scroll_top})",
                    d.left
                );
                assert!(
                    d.top >= natural.top && d.top <= parent.bottom - 24.0,
                    "top {} out of bounds at scroll ({scroll_left}, {scroll_top})",
                    d.top
                );
                scroll_top += 50.0;
            }
            scroll_left += 50.0;
        }
    }
}

#[test]
fn test_top_clamped_to_parent_bottom() {
    let geoms = [element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 50.0),
        ResolvedAlign::Left,
    )];
    // Scrolled far past the parent's bottom edge.
    let dests = compute_destinations(&geoms, &viewport(900.0, 0.0, 500.0));
    assert_eq!(dests[0].top, 350.0); // parent.bottom - height
}

#[test]
fn test_narrow_parent_degrades_to_parent_left() {
    let parent = Rect::from_size(100.0, 0.0, 60.0, 400.0);
    let geoms = [element(
        parent,
        Rect::from_size(100.0, 0.0, 90.0, 20.0),
        ResolvedAlign::Center,
    )];
    let dests = compute_destinations(&geoms, &viewport(0.0, 0.0, 500.0));
    assert_eq!(dests[0].left, 100.0);
}

#[test]
fn test_elements_are_independent() {
    let a = element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 20.0),
        ResolvedAlign::Left,
    );
    let b = element(
        Rect::from_size(200.0, 0.0, 300.0, 400.0),
        Rect::from_size(200.0, 40.0, 80.0, 20.0),
        ResolvedAlign::Right,
    );
    let vp = viewport(10.0, 120.0, 500.0);
    let together = compute_destinations(&[a, b], &vp);
    let alone_a = compute_destinations(&[a], &vp);
    let alone_b = compute_destinations(&[b], &vp);
    assert_eq!(together[0], alone_a[0]);
    assert_eq!(together[1], alone_b[0]);
}

// =============================================================================
// RELATIVE SHIFT TESTS
// =============================================================================

#[test]
fn test_relative_shift_is_offset_from_natural() {
    let natural = Rect::from_size(40.0, 60.0, 100.0, 20.0);
    let geoms = [element(wide_parent(), natural, ResolvedAlign::Left)];
    let dests = compute_destinations(&geoms, &viewport(100.0, 300.0, 500.0));
    let shifts = relative_shifts(&geoms, &dests);
    assert_eq!(shifts[0].left, dests[0].left - 40.0);
    assert_eq!(shifts[0].top, dests[0].top - 60.0);
    // Mirrored assignment for RTL containing blocks.
    assert_eq!(shifts[0].right(), -shifts[0].left);
}

#[test]
fn test_repeated_planning_does_not_compound() {
    // The natural bound already has prior offsets subtracted out, so the
    // same snapshot always produces the same shift.
    let natural = Rect::from_size(40.0, 60.0, 100.0, 20.0);
    let geoms = [element(wide_parent(), natural, ResolvedAlign::Left)];
    let vp = viewport(100.0, 300.0, 500.0);
    let first = relative_shifts(&geoms, &compute_destinations(&geoms, &vp));
    let second = relative_shifts(&geoms, &compute_destinations(&geoms, &vp));
    assert_eq!(first, second);
}

// =============================================================================
// NATIVE MODE TESTS
// =============================================================================

#[test]
fn test_native_centering_offset() {
    let geoms = [element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 20.0),
        ResolvedAlign::Center,
    )];
    let assignments = native_assignments(&geoms, 500.0);
    assert_eq!(assignments[0].left, 200.0); // (500 - 100) / 2
    assert_eq!(assignments[0].right, 200.0);
    assert_eq!(assignments[0].top, 0.0);
}

#[test]
fn test_native_edge_alignment_is_zero_offset() {
    for align in [ResolvedAlign::Left, ResolvedAlign::Right] {
        let geoms = [element(
            wide_parent(),
            Rect::from_size(0.0, 0.0, 100.0, 20.0),
            align,
        )];
        let assignments = native_assignments(&geoms, 500.0);
        assert_eq!(assignments[0].left, 0.0);
        assert_eq!(assignments[0].right, 0.0);
    }
}

// =============================================================================
// ENGINE LIFECYCLE TESTS
// =============================================================================

#[test]
fn test_emulated_engine_produces_relative_plan() {
    let engine = PinEngine::new(Direction::Ltr, StickyCaps::default());
    assert_eq!(engine.mode(), PinMode::Emulated);
    assert!(engine.needs_scroll_listener());

    let geoms = [element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 20.0),
        ResolvedAlign::Left,
    )];
    match engine.plan(&geoms, &viewport(0.0, 0.0, 500.0)) {
        Some(PinPlan::Relative(shifts)) => assert_eq!(shifts.len(), 1),
        other => panic!("expected relative plan, got {other:?}"),
    }
}

#[test]
fn test_native_engine_produces_native_plan() {
    let caps = StickyCaps {
        native_sticky: true,
        native_sticky_broken_rtl: true,
    };
    let engine = PinEngine::new(Direction::Ltr, caps);
    assert_eq!(engine.mode(), PinMode::Native);
    assert!(!engine.needs_scroll_listener());

    let geoms = [element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 20.0),
        ResolvedAlign::Center,
    )];
    match engine.plan(&geoms, &viewport(0.0, 0.0, 500.0)) {
        Some(PinPlan::Native(assignments)) => {
            assert_eq!(assignments[0].left, 200.0);
        }
        other => panic!("expected native plan, got {other:?}"),
    }
}

#[test]
fn test_broken_rtl_pairing_forces_emulation() {
    let caps = StickyCaps {
        native_sticky: true,
        native_sticky_broken_rtl: true,
    };
    let engine = PinEngine::new(Direction::Rtl, caps);
    assert_eq!(engine.mode(), PinMode::Emulated);
}

#[test]
fn test_destroyed_engine_is_inert() {
    let mut engine = PinEngine::new(Direction::Ltr, StickyCaps::default());
    engine.destroy();
    let geoms = [element(
        wide_parent(),
        Rect::from_size(0.0, 0.0, 100.0, 20.0),
        ResolvedAlign::Left,
    )];
    assert!(engine.plan(&geoms, &viewport(0.0, 50.0, 500.0)).is_none());
    // Teardown is safe to repeat.
    engine.destroy();
    assert!(engine.plan(&geoms, &viewport(0.0, 99.0, 500.0)).is_none());
}
