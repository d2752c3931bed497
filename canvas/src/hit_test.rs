use super::*;
use crate::doc::LayoutBox;

fn doc_with(boxes: &[(BoxId, f64, f64, u32)]) -> Document {
    let mut doc = Document::new();
    for &(id, x, y, size) in boxes {
        doc.push(LayoutBox {
            id,
            x,
            y,
            color: String::new(),
            size,
            text: String::new(),
            font_size: 14,
        });
    }
    doc
}

#[test]
fn empty_document_misses() {
    assert_eq!(hit_test(Point::new(10.0, 10.0), &Document::new()), None);
}

#[test]
fn point_inside_box_hits() {
    let doc = doc_with(&[(1, 200.0, 200.0, 60)]);
    assert_eq!(hit_test(Point::new(230.0, 230.0), &doc), Some(1));
}

#[test]
fn point_on_far_edge_misses() {
    let doc = doc_with(&[(1, 200.0, 200.0, 60)]);
    assert_eq!(hit_test(Point::new(260.0, 230.0), &doc), None);
}

#[test]
fn shared_edge_belongs_to_right_neighbour() {
    let doc = doc_with(&[(1, 200.0, 200.0, 60), (2, 260.0, 200.0, 60)]);
    assert_eq!(hit_test(Point::new(260.0, 210.0), &doc), Some(2));
}

#[test]
fn topmost_box_wins_when_stacked() {
    // Insertion placement does not check overlap, so stacks can exist.
    let doc = doc_with(&[(1, 0.0, 0.0, 100), (2, 20.0, 20.0, 40)]);
    assert_eq!(hit_test(Point::new(30.0, 30.0), &doc), Some(2));
    assert_eq!(hit_test(Point::new(5.0, 5.0), &doc), Some(1));
}
