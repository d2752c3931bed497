//! Shared numeric constants for the canvas crate.

// ── Grid ────────────────────────────────────────────────────────

/// Snap step for every dropped coordinate, in document units.
pub const GRID_STEP: f64 = 20.0;

/// Top-left corner of the first box added to an empty document.
pub const FIRST_BOX_ANCHOR: (f64, f64) = (200.0, 200.0);

// ── Boxes ───────────────────────────────────────────────────────

pub const DEFAULT_BOX_SIZE: u32 = 60;
pub const MIN_BOX_SIZE: u32 = 20;
pub const MAX_BOX_SIZE: u32 = 200;

pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 48;

/// Hard cap on the number of boxes in one document.
pub const MAX_BOXES: usize = 101;

// ── Zoom ────────────────────────────────────────────────────────

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Zoom change per modifier+wheel event.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

/// Fraction of the pinch scale delta applied to zoom.
pub const PINCH_ZOOM_GAIN: f64 = 0.5;

// ── Touch ───────────────────────────────────────────────────────

/// A touch released within this many milliseconds counts as a tap.
pub const TAP_MAX_MS: f64 = 300.0;

/// Holding a touch this long without dragging surfaces the delete affordance.
pub const LONG_PRESS_MS: f64 = 500.0;

/// Document-space distance a touch must travel before it becomes a drag.
pub const TOUCH_DRAG_THRESHOLD: f64 = 10.0;

// ── Palette ─────────────────────────────────────────────────────

/// Golden angle in degrees; hue advance per palette entry.
pub const GOLDEN_ANGLE_DEG: f64 = 137.508;

// ── Persistence ─────────────────────────────────────────────────

/// Local cache key for the layout document.
pub const STORAGE_KEY: &str = "dws_app";
