//! Pure geometry helpers: grid snapping, overlap testing, insertion placement.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;
use crate::consts::{FIRST_BOX_ANCHOR, GRID_STEP};
use crate::doc::LayoutBox;

/// Round `value` to the nearest multiple of [`GRID_STEP`].
///
/// Ties round toward positive infinity, so `-10` snaps to `0` rather than
/// `-20`. The result never carries a negative zero.
#[must_use]
pub fn snap_to_grid(value: f64) -> f64 {
    (value / GRID_STEP + 0.5).floor() * GRID_STEP + 0.0
}

/// An axis-aligned square in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.size
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.size
    }

    /// Whether `p` lies inside the square (left/top edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

impl From<&LayoutBox> for Rect {
    fn from(b: &LayoutBox) -> Self {
        Self { x: b.x, y: b.y, size: f64::from(b.size) }
    }
}

/// Whether two squares overlap. Shared edges do not count.
#[must_use]
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    !(a.right() <= b.x || a.x >= b.right() || a.bottom() <= b.y || a.y >= b.bottom())
}

/// Where the next box goes: the anchor for an empty layout, otherwise flush
/// against the right edge of the most recently added box.
///
/// There is no row wrap and no search for free space; long runs extend past
/// the visible canvas.
#[must_use]
pub fn next_insertion_point(boxes: &[LayoutBox]) -> Point {
    match boxes.last() {
        None => Point::new(FIRST_BOX_ANCHOR.0, FIRST_BOX_ANCHOR.1),
        Some(last) => Point::new(last.x + f64::from(last.size), last.y),
    }
}

/// Clamp one axis of a box position so the whole box stays inside a container
/// of `container_len` screen pixels at `zoom`.
///
/// The upper bound is floored so snapped coordinates stay integral. If the
/// container is narrower than the box the lower bound wins.
#[must_use]
pub fn clamp_axis(candidate: f64, box_size: f64, container_len: f64, zoom: f64) -> f64 {
    let upper = (container_len / zoom - box_size).floor();
    candidate.min(upper).max(0.0)
}
