#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{BoxId, Document};

/// The box under `doc_pt`, if any.
///
/// Boxes later in the document render on top, so the search runs from the
/// most recently added box backwards.
#[must_use]
pub fn hit_test(doc_pt: Point, doc: &Document) -> Option<BoxId> {
    doc.boxes()
        .iter()
        .rev()
        .find(|b| b.rect().contains(doc_pt))
        .map(|b| b.id)
}
