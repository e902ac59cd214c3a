//! Divider drag width-math tests
//!
//! Verifies clamping, RTL delta inversion and monotonicity of the pane
//! width as a function of the drag delta.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use scrollgrid::geom::Direction;
use scrollgrid::resizer::{DragSession, MIN_PANE_WIDTH};
use test_case::test_case;

#[test_case(Direction::Ltr, 50.0, 350.0 ; "ltr grows with positive delta")]
#[test_case(Direction::Ltr, -50.0, 250.0 ; "ltr shrinks with negative delta")]
#[test_case(Direction::Rtl, 50.0, 250.0 ; "rtl inverts positive delta")]
#[test_case(Direction::Rtl, -50.0, 350.0 ; "rtl inverts negative delta")]
fn test_delta_sign_handling(direction: Direction, delta: f64, expected: f64) {
    let session = DragSession::new(300.0, 1000.0, direction);
    assert_eq!(session.width_for_delta(delta), expected);
}

#[test_case(Direction::Ltr ; "ltr")]
#[test_case(Direction::Rtl ; "rtl")]
fn test_width_always_within_bounds(direction: Direction) {
    let session = DragSession::new(300.0, 1000.0, direction);
    let mut delta = -2000.0;
    while delta <= 2000.0 {
        let width = session.width_for_delta(delta);
        assert!(
            (MIN_PANE_WIDTH..=1000.0 - MIN_PANE_WIDTH).contains(&width),
            "width {width} out of bounds at delta {delta}"
        );
        delta += 37.0;
    }
}

#[test]
fn test_width_is_monotonic_in_delta() {
    let session = DragSession::new(300.0, 1000.0, Direction::Ltr);
    let mut previous = session.width_for_delta(-2000.0);
    let mut delta = -2000.0;
    while delta <= 2000.0 {
        let width = session.width_for_delta(delta);
        assert!(width >= previous, "regression at delta {delta}");
        previous = width;
        delta += 25.0;
    }
}

#[test]
fn test_rtl_mirrors_ltr() {
    let ltr = DragSession::new(300.0, 1000.0, Direction::Ltr);
    let rtl = DragSession::new(300.0, 1000.0, Direction::Rtl);
    for delta in [-400.0, -120.0, 0.0, 75.0, 333.0] {
        assert_eq!(ltr.width_for_delta(delta), rtl.width_for_delta(-delta));
    }
}

#[test]
fn test_unclamped_region_tracks_delta_exactly() {
    let session = DragSession::new(300.0, 1000.0, Direction::Ltr);
    for delta in [-200.0, -50.0, 0.0, 50.0, 200.0] {
        assert_eq!(session.width_for_delta(delta), 300.0 + delta);
    }
}

#[test]
fn test_cramped_layout_still_honors_trailing_minimum() {
    // Total width barely fits both minimums; the trailing clamp wins.
    let session = DragSession::new(40.0, MIN_PANE_WIDTH * 2.0, Direction::Ltr);
    assert_eq!(session.width_for_delta(500.0), MIN_PANE_WIDTH);
    assert_eq!(session.width_for_delta(-500.0), MIN_PANE_WIDTH);
}
