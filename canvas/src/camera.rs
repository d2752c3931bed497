//! Viewport transform: zoom, pan, and screen/document conversions.
//!
//! Box coordinates are always pan-independent. Pan is a translation of the
//! rendered layer, so it takes part in [`Viewport::document_to_screen`] but is
//! deliberately absent from [`Viewport::screen_to_document`], which measures
//! pointers relative to the (already translated) container origin.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, PINCH_ZOOM_GAIN, WHEEL_ZOOM_STEP};

/// A point in either screen or document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Clamp a zoom factor into the supported range.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return DEFAULT_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom/pan state of the canvas.
///
/// `pan` is in screen pixels and unbounded. `zoom` is the number of screen
/// pixels per document unit, always within `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM, pan: Point::default() }
    }
}

impl Viewport {
    /// Convert a pointer position to document coordinates relative to the
    /// container's on-screen origin.
    #[must_use]
    pub fn screen_to_document(&self, screen: Point, container_origin: Point) -> Point {
        Point {
            x: (screen.x - container_origin.x) / self.zoom,
            y: (screen.y - container_origin.y) / self.zoom,
        }
    }

    /// The document point drawn under a pointer position. Unlike
    /// [`Self::screen_to_document`] this undoes the layer's pan translation,
    /// so it matches what the user actually sees; use it for hit-testing.
    #[must_use]
    pub fn screen_to_layer(&self, screen: Point, container_origin: Point) -> Point {
        Point {
            x: (screen.x - container_origin.x - self.pan.x) / self.zoom,
            y: (screen.y - container_origin.y - self.pan.y) / self.zoom,
        }
    }

    /// Where a document point renders inside the container, after the layer's
    /// pan translation and zoom scale.
    #[must_use]
    pub fn document_to_screen(&self, doc: Point) -> Point {
        Point {
            x: doc.x * self.zoom + self.pan.x,
            y: doc.y * self.zoom + self.pan.y,
        }
    }

    /// Convert a screen-space length to document units.
    #[must_use]
    pub fn screen_dist_to_document(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Set zoom, clamping into range. Returns `true` if the value changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let next = clamp_zoom(zoom);
        let changed = (next - self.zoom).abs() > f64::EPSILON;
        self.zoom = next;
        changed
    }

    /// Apply one wheel notch: scrolling down zooms out, anything else zooms in.
    pub fn wheel_zoom(&mut self, delta_y: f64) -> bool {
        let step = if delta_y > 0.0 { -WHEEL_ZOOM_STEP } else { WHEEL_ZOOM_STEP };
        self.set_zoom(self.zoom + step)
    }

    /// Apply a pinch scale factor (`current / previous` finger distance).
    pub fn pinch_zoom(&mut self, scale: f64) -> bool {
        self.set_zoom(self.zoom + (scale - 1.0) * PINCH_ZOOM_GAIN)
    }

    /// Zoom as a whole percentage for display.
    #[must_use]
    pub fn zoom_percent(&self) -> i64 {
        #[allow(clippy::cast_possible_truncation)]
        let pct = (self.zoom * 100.0).round() as i64;
        pct
    }
}

/// Distance between two touch points, in screen pixels.
#[must_use]
pub fn touch_distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Tracks the finger distance of a two-point gesture between updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pinch {
    last_distance: f64,
}

impl Pinch {
    #[must_use]
    pub fn new(distance: f64) -> Self {
        Self { last_distance: distance }
    }

    #[must_use]
    pub fn last_distance(&self) -> f64 {
        self.last_distance
    }

    /// Record a new distance, returning the scale relative to the previous
    /// sample. The first sample (or one following a zero distance) only records.
    pub fn update(&mut self, distance: f64) -> Option<f64> {
        let scale = (self.last_distance > 0.0).then(|| distance / self.last_distance);
        self.last_distance = distance;
        scale
    }
}
