//! Document model: layout boxes and the ordered collection that owns them.
//!
//! This module defines the box type as it appears on the wire and in the
//! local cache (`LayoutBox`), the ordered, capacity-limited store the
//! interaction engine mutates (`Document`), the settings applied to the next
//! inserted box (`NewBoxSettings`), and the session id allocator.
//!
//! Insertion order is meaningful: it drives list display, the default
//! `"Box N"` label and the placement of the next box.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BOX_SIZE, DEFAULT_FONT_SIZE, MAX_BOXES, MAX_BOX_SIZE, MAX_FONT_SIZE, MIN_BOX_SIZE, MIN_FONT_SIZE,
};
use crate::geometry::{Rect, rects_overlap};

/// Unique identifier for a layout box (creation time in ms, made monotonic).
pub type BoxId = i64;

/// A square box placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Unique identifier.
    pub id: BoxId,
    /// Left edge in document space.
    pub x: f64,
    /// Top edge in document space.
    pub y: f64,
    /// CSS color string from the palette.
    pub color: String,
    /// Edge length in document units.
    pub size: u32,
    /// User label.
    pub text: String,
    /// Label font size in pixels.
    #[serde(rename = "fontSize")]
    pub font_size: u32,
}

impl LayoutBox {
    /// Bounding square at the current position.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from(self)
    }

    /// Bounding square if the box were moved to `(x, y)`.
    #[must_use]
    pub fn rect_at(&self, x: f64, y: f64) -> Rect {
        Rect::new(x, y, f64::from(self.size))
    }
}

/// Ordered, capacity-limited collection of boxes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    boxes: Vec<LayoutBox>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a stored list, keeping at most [`MAX_BOXES`].
    #[must_use]
    pub fn from_boxes(mut boxes: Vec<LayoutBox>) -> Self {
        boxes.truncate(MAX_BOXES);
        Self { boxes }
    }

    /// Append a box. Returns `false` (and drops nothing) when full.
    pub fn push(&mut self, b: LayoutBox) -> bool {
        if self.is_full() {
            return false;
        }
        self.boxes.push(b);
        true
    }

    /// Remove a box by id, returning it if present.
    pub fn remove(&mut self, id: BoxId) -> Option<LayoutBox> {
        let idx = self.boxes.iter().position(|b| b.id == id)?;
        Some(self.boxes.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: BoxId) -> bool {
        self.get(id).is_some()
    }

    /// Move a box. Returns false if the id is unknown.
    pub fn move_to(&mut self, id: BoxId, x: f64, y: f64) -> bool {
        let Some(b) = self.boxes.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        b.x = x;
        b.y = y;
        true
    }

    /// Replace a box's label. Returns false if the id is unknown.
    pub fn set_text(&mut self, id: BoxId, text: String) -> bool {
        let Some(b) = self.boxes.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        b.text = text;
        true
    }

    /// Whether the box `id`, placed at `(x, y)`, would overlap any other box.
    #[must_use]
    pub fn overlaps_any(&self, id: BoxId, x: f64, y: f64) -> bool {
        let Some(moving) = self.get(id) else {
            return false;
        };
        let candidate = moving.rect_at(x, y);
        self.boxes
            .iter()
            .filter(|other| other.id != id)
            .any(|other| rects_overlap(candidate, other.rect()))
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    /// Boxes in insertion order.
    #[must_use]
    pub fn boxes(&self) -> &[LayoutBox] {
        &self.boxes
    }

    /// One-based list position of a box.
    #[must_use]
    pub fn position_of(&self, id: BoxId) -> Option<usize> {
        self.boxes.iter().position(|b| b.id == id).map(|i| i + 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.boxes.len() >= MAX_BOXES
    }

    /// Whether the add-box action should be enabled.
    #[must_use]
    pub fn add_enabled(&self) -> bool {
        !self.is_full()
    }

    /// `"n/101"` counter shown next to the add action and list header.
    #[must_use]
    pub fn capacity_label(&self) -> String {
        format!("{}/{MAX_BOXES}", self.boxes.len())
    }
}

/// Size and font size applied to the next inserted box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBoxSettings {
    pub size: u32,
    pub font_size: u32,
}

impl Default for NewBoxSettings {
    fn default() -> Self {
        Self { size: DEFAULT_BOX_SIZE, font_size: DEFAULT_FONT_SIZE }
    }
}

impl NewBoxSettings {
    /// Parse a box-size input. Unparseable or zero input falls back to the
    /// default; anything else is clamped into range.
    pub fn set_size(&mut self, raw: &str) {
        self.size = parse_clamped(raw, DEFAULT_BOX_SIZE, MIN_BOX_SIZE, MAX_BOX_SIZE);
    }

    /// Parse a font-size input with the same rules as [`Self::set_size`].
    pub fn set_font_size(&mut self, raw: &str) {
        self.font_size = parse_clamped(raw, DEFAULT_FONT_SIZE, MIN_FONT_SIZE, MAX_FONT_SIZE);
    }
}

fn parse_clamped(raw: &str, default: u32, min: u32, max: u32) -> u32 {
    let value = match raw.trim().parse::<i64>() {
        Ok(0) | Err(_) => i64::from(default),
        Ok(v) => v,
    };
    let clamped = value.clamp(i64::from(min), i64::from(max));
    u32::try_from(clamped).unwrap_or(default)
}

/// Hands out time-based ids that stay unique within a session even when the
/// clock does not advance between two allocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxIdAllocator {
    last: BoxId,
}

impl BoxIdAllocator {
    /// Make sure future ids never collide with ids already in `doc`.
    pub fn observe(&mut self, doc: &Document) {
        if let Some(max) = doc.boxes().iter().map(|b| b.id).max() {
            self.last = self.last.max(max);
        }
    }

    /// Allocate the next id from a millisecond clock reading.
    pub fn next(&mut self, now_ms: f64) -> BoxId {
        #[allow(clippy::cast_possible_truncation)]
        let now = now_ms.floor() as BoxId;
        let id = now.max(self.last + 1);
        self.last = id;
        id
    }
}
