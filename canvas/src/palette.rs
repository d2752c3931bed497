//! Visually distinct box colors generated by golden-angle hue stepping.
//!
//! No literal palette table is stored: each entry advances hue by the golden
//! angle while saturation cycles through 3 levels and lightness through 4,
//! which keeps neighbours far apart for the first hundred or so entries.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::consts::{GOLDEN_ANGLE_DEG, MAX_BOXES};

static PALETTE: LazyLock<Vec<String>> = LazyLock::new(|| generate_distinct_colors(MAX_BOXES));

/// Generate `count` CSS `hsl()` colors.
#[must_use]
pub fn generate_distinct_colors(count: usize) -> Vec<String> {
    (0..count).map(color_at).collect()
}

/// The `index`th palette color.
#[must_use]
pub fn color_at(index: usize) -> String {
    #[allow(clippy::cast_precision_loss)]
    let hue = (index as f64 * GOLDEN_ANGLE_DEG) % 360.0;
    let saturation = 65 + (index % 3) * 10;
    let lightness = 25 + (index % 4) * 5;
    format!("hsl({hue}, {saturation}%, {lightness}%)")
}

/// The process-wide palette, one entry per allowed box.
#[must_use]
pub fn palette() -> &'static [String] {
    &PALETTE
}

/// Pick the color for a new box: the first palette entry nobody uses yet, or
/// a cyclic reuse by box count once every entry is taken.
#[must_use]
pub fn pick_color<'a>(used: impl IntoIterator<Item = &'a str>, box_count: usize) -> String {
    let used: HashSet<&str> = used.into_iter().collect();
    let colors = palette();
    colors
        .iter()
        .find(|c| !used.contains(c.as_str()))
        .cloned()
        .unwrap_or_else(|| colors[box_count % colors.len()].clone())
}
