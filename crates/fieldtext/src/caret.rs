#![forbid(unsafe_code)]

//! Pixel-space hit testing and caret/selection geometry.
//!
//! These helpers map between horizontal pixel offsets and character columns
//! within a single display line, and build the rectangles the painting
//! collaborator fills in. Vertical placement is uniform: line `n` starts at
//! `n * line_height` below the text-region origin.

use fieldtext_core::{FontMetrics, Insets, Rect};

/// Caret bar width in pixels.
const CARET_WIDTH: f32 = 2.0;

/// Column whose glyph contains the pixel offset `x`, by the half-width
/// rule: the first glyph whose midpoint lies right of `x` wins. Past the
/// last midpoint, the end of the line.
///
/// This is the click-to-column rule; a single-line editing surface can call
/// it directly with its own horizontal scroll offset already applied.
#[must_use]
pub fn column_at_x<M: FontMetrics + ?Sized>(line: &str, x: f32, metrics: &M) -> usize {
    let mut column = 0;
    for glyph in metrics.glyphs(line) {
        if glyph.x + glyph.width / 2.0 > x {
            break;
        }
        column += 1;
    }
    column
}

/// Column of `line` whose boundary pixel offset is closest to `target_x`.
///
/// Boundaries are the glyph left edges plus the trailing edge of the last
/// glyph, so the end of the line is a valid landing spot. Ties favor the
/// earlier column. Used for vertical navigation, which preserves the pixel
/// position of the caret rather than its character column.
#[must_use]
pub fn closest_column<M: FontMetrics + ?Sized>(line: &str, target_x: f32, metrics: &M) -> usize {
    let glyphs = metrics.glyphs(line);
    let mut best = 0;
    let mut best_distance = f32::INFINITY;

    for (column, glyph) in glyphs.iter().enumerate() {
        let distance = (glyph.x - target_x).abs();
        if distance < best_distance {
            best = column;
            best_distance = distance;
        }
    }
    if let Some(last) = glyphs.last() {
        if (last.right() - target_x).abs() < best_distance {
            best = glyphs.len();
        }
    }

    best
}

/// Caret bar rectangle for a caret `left` pixels into line `line`.
#[must_use]
pub fn caret_rect(padding: &Insets, line: usize, left: f32, line_height: f32) -> Rect {
    Rect::new(
        padding.left + left - CARET_WIDTH,
        padding.top + line as f32 * line_height + 2.0,
        CARET_WIDTH,
        line_height - 4.0,
    )
}

/// Selection highlight rectangle covering `width` pixels starting `left`
/// pixels into line `line`.
#[must_use]
pub fn span_rect(padding: &Insets, line: usize, left: f32, width: f32, line_height: f32) -> Rect {
    Rect::new(
        padding.left + left - 1.0,
        padding.top + line as f32 * line_height,
        width,
        line_height - 1.0,
    )
}
