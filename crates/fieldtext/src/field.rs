#![forbid(unsafe_code)]

//! The field layout engine.
//!
//! [`FieldLayout`] owns the logical text and the wrap configuration, derives
//! the display text and break map from them, and answers every geometry
//! query the editing surface needs. The derived pair is a pure function of
//! its inputs: setters recompute it synchronously before returning, so a
//! query can never observe partially stale state, and nothing is patched
//! incrementally.
//!
//! Out-of-range indices clamp (end of text for indices past the end, start
//! of text for underflow); queries never fail.

use crate::breaks::BreakMap;
use crate::caret;
use crate::line::{self, LinePosition};
use crate::wrap::{self, WrapConfig};
use fieldtext_core::{FontMetrics, Insets, Rect};
use smallvec::SmallVec;
use std::fmt;
use tracing::trace;

/// Text-region padding inside the field, matching the host widget's inset.
const DEFAULT_PADDING: Insets = Insets::new(7.0, 10.0, 7.0, 10.0);

/// Errors surfaced by [`FieldLayout::validate`].
///
/// Queries themselves are total; these exist so hosts and tests can check a
/// layout instead of silently rendering from a bad one.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Wrapping is enabled with a non-positive line width. Layout still
    /// terminates (every character gets its own line), but the result is
    /// not meaningful.
    InvalidConfiguration {
        /// The offending width.
        max_width: f32,
    },
    /// The derived display text and break map disagree with the logical
    /// text they were computed from. Indicates an internal bug.
    InconsistentState {
        /// Characters in the display text.
        display_chars: usize,
        /// Synthetic breaks recorded.
        break_count: usize,
        /// Characters in the logical text.
        logical_chars: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { max_width } => {
                write!(f, "wrap enabled with non-positive max width {max_width}")
            }
            Self::InconsistentState {
                display_chars,
                break_count,
                logical_chars,
            } => write!(
                f,
                "display text ({display_chars} chars, {break_count} breaks) does not \
                 reduce to the logical text ({logical_chars} chars)"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// One display line with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'a> {
    /// The line's text (no trailing break).
    pub text: &'a str,
    /// Display offset of the line's first character.
    pub start: usize,
    /// True if the line starts after a synthetic break, i.e. it is a
    /// wrapped continuation rather than a user-authored line.
    pub is_wrap: bool,
}

/// Layout engine for one editable text field.
#[derive(Debug, Clone)]
pub struct FieldLayout<M> {
    metrics: M,
    config: WrapConfig,
    padding: Insets,
    text: String,
    display: String,
    breaks: BreakMap,
}

impl<M: FontMetrics> FieldLayout<M> {
    /// Create an empty layout with the given metrics and configuration.
    #[must_use]
    pub fn new(metrics: M, config: WrapConfig) -> Self {
        let mut layout = Self {
            metrics,
            config,
            padding: DEFAULT_PADDING,
            text: String::new(),
            display: String::new(),
            breaks: BreakMap::default(),
        };
        layout.rebuild();
        layout
    }

    /// Set the text-region padding. Padding offsets pixel queries only and
    /// does not affect wrapping.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Replace the logical text and recompute layout.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.rebuild();
    }

    /// Replace the wrap configuration and recompute layout.
    pub fn set_config(&mut self, config: WrapConfig) {
        if self.config != config {
            self.config = config;
            self.rebuild();
        }
    }

    /// Update the maximum line width and recompute layout.
    pub fn set_max_width(&mut self, max_width: f32) {
        if self.config.max_width != max_width {
            self.config.max_width = max_width;
            self.rebuild();
        }
    }

    /// Enable or disable wrapping and recompute layout.
    pub fn set_wrap_enabled(&mut self, enabled: bool) {
        if self.config.enabled != enabled {
            self.config.enabled = enabled;
            self.rebuild();
        }
    }

    /// Replace the preferred break characters and recompute layout.
    pub fn set_break_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        let chars: SmallVec<[char; 4]> = chars.into_iter().collect();
        if self.config.break_chars != chars {
            self.config.break_chars = chars;
            self.rebuild();
        }
    }

    /// The logical text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The display text: logical text with synthetic breaks inserted.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display
    }

    /// Display offsets of the synthetic breaks, ascending.
    #[must_use]
    pub fn break_indices(&self) -> &[usize] {
        self.breaks.as_slice()
    }

    /// The current wrap configuration.
    #[must_use]
    pub fn config(&self) -> &WrapConfig {
        &self.config
    }

    /// The text-region padding.
    #[must_use]
    pub fn padding(&self) -> Insets {
        self.padding
    }

    /// The display lines with their provenance.
    #[must_use]
    pub fn lines(&self) -> Vec<LineSpan<'_>> {
        let mut out = Vec::new();
        let mut start = 0;
        for text in self.display.split('\n') {
            let is_wrap = start > 0 && self.breaks.as_slice().contains(&(start - 1));
            out.push(LineSpan {
                text,
                start,
                is_wrap,
            });
            start += text.chars().count() + 1;
        }
        out
    }

    /// Translate a logical offset to a display offset. Clamps to the end of
    /// the text.
    #[must_use]
    pub fn to_display(&self, logical_index: usize) -> usize {
        let clamped = logical_index.min(self.text.chars().count());
        self.breaks.to_display(clamped)
    }

    /// Translate a display offset to a logical offset. Clamps to the end of
    /// the display text.
    #[must_use]
    pub fn to_logical(&self, display_index: usize) -> usize {
        let clamped = display_index.min(self.display.chars().count());
        self.breaks.to_logical(clamped)
    }

    /// Move a logical cursor index vertically by `delta` display lines,
    /// preserving the caret's horizontal pixel position rather than its
    /// character column.
    ///
    /// Moving above the first line lands at offset 0; moving below the last
    /// line lands at the end of the text.
    #[must_use]
    pub fn move_line(&self, logical_index: usize, delta: isize) -> usize {
        let lines = line::split_lines(&self.display);
        let position = line::position_of(&self.display, self.to_display(logical_index));

        let target = position.line as isize + delta;
        if target < 0 {
            return 0;
        }
        let target = target as usize;
        if target >= lines.len() {
            return self.breaks.to_logical(self.display.chars().count());
        }

        let target_x = self.measure_prefix(lines[position.line], position.column);
        let column = caret::closest_column(lines[target], target_x, &self.metrics);
        let display_index = line::index_of(&lines, LinePosition::new(target, column));
        self.breaks.to_logical(display_index)
    }

    /// Logical index under the pixel point `(x, y)`, in field coordinates.
    ///
    /// Points above the text land on the first line, points below it at the
    /// end of the text; within a line the glyph half-width rule applies.
    #[must_use]
    pub fn point_to_index(&self, x: f32, y: f32) -> usize {
        let x = x - self.padding.left;
        let y = y - self.padding.top;
        let lines = line::split_lines(&self.display);

        let row = if y < 0.0 {
            0
        } else {
            (y / self.metrics.line_height()) as usize
        };
        if row >= lines.len() {
            return self.breaks.to_logical(self.display.chars().count());
        }

        let column = caret::column_at_x(lines[row], x, &self.metrics);
        let display_index = line::index_of(&lines, LinePosition::new(row, column));
        self.breaks.to_logical(display_index)
    }

    /// Caret bar rectangle for a logical cursor index.
    #[must_use]
    pub fn caret_rect(&self, logical_index: usize) -> Rect {
        let lines = line::split_lines(&self.display);
        let position = line::position_of(&self.display, self.to_display(logical_index));
        let left = self.measure_prefix(lines[position.line], position.column);
        caret::caret_rect(
            &self.padding,
            position.line,
            left,
            self.metrics.line_height(),
        )
    }

    /// Selection highlight rectangles for the logical span `start..end`.
    ///
    /// The endpoints are unordered. Returns an empty list for an empty span
    /// or a span running past the end of the text; one rectangle per display
    /// line touched otherwise.
    #[must_use]
    pub fn selection_rects(&self, start: usize, end: usize) -> Vec<Rect> {
        let span_start = start.min(end);
        let span_len = start.abs_diff(end);
        if span_len == 0 || span_start + span_len > self.text.chars().count() {
            return Vec::new();
        }

        let lines = line::split_lines(&self.display);
        let line_height = self.metrics.line_height();
        let from = line::position_of(&self.display, self.breaks.to_display(span_start));
        let to = line::position_of(&self.display, self.breaks.to_display(span_start + span_len));

        if from.line == to.line {
            let text = lines[from.line];
            let left = self.measure_prefix(text, from.column);
            let width = self.measure_span(text, from.column, to.column);
            return vec![caret::span_rect(
                &self.padding,
                from.line,
                left,
                width,
                line_height,
            )];
        }

        let mut rects = Vec::with_capacity(to.line - from.line + 1);

        let first = lines[from.line];
        let left = self.measure_prefix(first, from.column);
        let width = self.measure_span(first, from.column, first.chars().count());
        rects.push(caret::span_rect(
            &self.padding,
            from.line,
            left,
            width,
            line_height,
        ));

        for row in from.line + 1..to.line {
            let width = self.metrics.measure(lines[row]);
            rects.push(caret::span_rect(&self.padding, row, 0.0, width, line_height));
        }

        let width = self.measure_prefix(lines[to.line], to.column);
        rects.push(caret::span_rect(
            &self.padding,
            to.line,
            0.0,
            width,
            line_height,
        ));

        rects
    }

    /// Check the configuration and the derived state.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.config.enabled && self.config.max_width <= 0.0 {
            return Err(LayoutError::InvalidConfiguration {
                max_width: self.config.max_width,
            });
        }
        self.check_consistency()
    }

    fn check_consistency(&self) -> Result<(), LayoutError> {
        let display_chars = self.display.chars().count();
        let logical_chars = self.text.chars().count();
        if display_chars.saturating_sub(self.breaks.len()) != logical_chars {
            return Err(LayoutError::InconsistentState {
                display_chars,
                break_count: self.breaks.len(),
                logical_chars,
            });
        }
        Ok(())
    }

    fn rebuild(&mut self) {
        let result = wrap::wrap(&self.text, &self.config, &self.metrics);
        self.display = result.display;
        self.breaks = BreakMap::new(result.breaks);

        trace!(
            logical_chars = self.text.chars().count(),
            display_chars = self.display.chars().count(),
            breaks = self.breaks.len(),
            max_width = f64::from(self.config.max_width),
            "layout rebuilt"
        );
        debug_assert!(
            self.check_consistency().is_ok(),
            "display/break bookkeeping out of sync with logical text"
        );
    }

    /// Width of the first `column` characters of `text`, measured as one
    /// string.
    fn measure_prefix(&self, text: &str, column: usize) -> f32 {
        let prefix: String = text.chars().take(column).collect();
        self.metrics.measure(&prefix)
    }

    /// Width of the characters of `text` between the columns `from` and
    /// `to`, measured as one string.
    fn measure_span(&self, text: &str, from: usize, to: usize) -> f32 {
        let span: String = text.chars().skip(from).take(to.saturating_sub(from)).collect();
        self.metrics.measure(&span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldtext_core::FixedMetrics;

    fn layout(text: &str, max_width: f32) -> FieldLayout<FixedMetrics> {
        let mut layout = FieldLayout::new(FixedMetrics::new(10.0, 20.0), WrapConfig::new(max_width));
        layout.set_text(text);
        layout
    }

    #[test]
    fn wraps_and_translates() {
        let layout = layout("hello world foo", 115.0);
        assert_eq!(layout.display_text(), "hello world \nfoo");
        assert_eq!(layout.break_indices(), &[12]);
        assert_eq!(layout.to_logical(13), 12);
        assert_eq!(layout.to_display(12), 13);
        layout.validate().expect("layout is consistent");
    }

    #[test]
    fn disabling_wrap_restores_identity() {
        let mut layout = layout("hello world foo", 115.0);
        layout.set_wrap_enabled(false);
        assert_eq!(layout.display_text(), "hello world foo");
        assert!(layout.break_indices().is_empty());
        assert_eq!(layout.to_display(12), 12);
    }

    #[test]
    fn translation_clamps_out_of_range() {
        let layout = layout("hi", 500.0);
        assert_eq!(layout.to_display(99), 2);
        assert_eq!(layout.to_logical(99), 2);
    }

    #[test]
    fn lines_carry_provenance() {
        let layout = layout("hello world foo", 115.0);
        let lines = layout.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "hello world ");
        assert_eq!(lines[0].start, 0);
        assert!(!lines[0].is_wrap);
        assert_eq!(lines[1].text, "foo");
        assert_eq!(lines[1].start, 13);
        assert!(lines[1].is_wrap);
    }

    #[test]
    fn user_lines_are_not_wrap_continuations() {
        let layout = layout("ab\ncd", 500.0);
        let lines = layout.lines();
        assert_eq!(lines.len(), 2);
        assert!(!lines[1].is_wrap);
    }

    #[test]
    fn move_line_preserves_pixel_position() {
        let layout = layout("hello\nhi", 500.0);
        // Column 3 of "hello" sits at 30 px; "hi" ends at 20 px, so the
        // caret clamps to the end of the shorter line.
        assert_eq!(layout.move_line(3, 1), 8);
    }

    #[test]
    fn move_line_up_snaps_to_nearest_column() {
        let layout = layout("hello\nhi", 500.0);
        // Logical 7 is column 1 of "hi" (10 px); column 1 of "hello" is
        // nearest.
        assert_eq!(layout.move_line(7, -1), 1);
    }

    #[test]
    fn move_line_clamps_at_both_ends() {
        let layout = layout("hello\nhi", 500.0);
        assert_eq!(layout.move_line(0, 5), 8);
        assert_eq!(layout.move_line(7, -3), 0);
    }

    #[test]
    fn move_line_crosses_synthetic_breaks() {
        let layout = layout("hello world foo", 115.0);
        // From logical 2 ("l", 20 px on line 0) down to line 1 ("foo"):
        // boundary 20 px is column 2, logical index 14.
        assert_eq!(layout.move_line(2, 1), 14);
    }

    #[test]
    fn point_to_index_hits_glyphs() {
        let layout = layout("hello\nhi", 500.0);
        // (24, 32) minus padding (10, 7) is (14, 25): line 1, right of the
        // midpoint of 'h'.
        assert_eq!(layout.point_to_index(24.0, 32.0), 7);
    }

    #[test]
    fn point_below_text_is_end_of_text() {
        let layout = layout("hello\nhi", 500.0);
        assert_eq!(layout.point_to_index(5.0, 500.0), 8);
    }

    #[test]
    fn point_above_text_clamps_to_first_line() {
        let layout = layout("hello\nhi", 500.0);
        assert_eq!(layout.point_to_index(10.0, 0.0), 0);
    }

    #[test]
    fn caret_rect_at_origin() {
        let layout = layout("hello", 500.0);
        assert_eq!(layout.caret_rect(0), Rect::new(8.0, 9.0, 2.0, 16.0));
    }

    #[test]
    fn caret_rect_after_synthetic_break() {
        let layout = layout("hello world foo", 115.0);
        // Logical 12 ('f') renders at the start of display line 1.
        assert_eq!(layout.caret_rect(12), Rect::new(8.0, 29.0, 2.0, 16.0));
    }

    #[test]
    fn selection_within_one_line() {
        let layout = layout("hello", 500.0);
        let rects = layout.selection_rects(2, 3);
        assert_eq!(rects, vec![Rect::new(29.0, 7.0, 10.0, 19.0)]);
        // Endpoints are unordered.
        assert_eq!(layout.selection_rects(3, 2), rects);
    }

    #[test]
    fn selection_empty_or_out_of_range_yields_nothing() {
        let layout = layout("hi", 500.0);
        assert!(layout.selection_rects(1, 1).is_empty());
        assert!(layout.selection_rects(0, 3).is_empty());
    }

    #[test]
    fn selection_across_user_break_spans_two_lines() {
        let layout = layout("hello\nhi", 500.0);
        let rects = layout.selection_rects(3, 8);
        assert_eq!(
            rects,
            vec![
                Rect::new(39.0, 7.0, 20.0, 19.0),
                Rect::new(9.0, 27.0, 20.0, 19.0),
            ]
        );
    }

    #[test]
    fn selection_spanning_n_breaks_has_n_plus_one_rects() {
        let layout = layout("abcdefghijkl", 25.0);
        assert_eq!(layout.display_text(), "ab\ncd\nef\ngh\nij\nkl");
        let rects = layout.selection_rects(1, 5);
        assert_eq!(
            rects,
            vec![
                Rect::new(19.0, 7.0, 10.0, 19.0),
                Rect::new(9.0, 27.0, 20.0, 19.0),
                Rect::new(9.0, 47.0, 10.0, 19.0),
            ]
        );
    }

    #[test]
    fn invalid_configuration_is_reported_not_raised() {
        let layout = layout("ab", 0.0);
        // Wrapping still terminated; every char got its own line.
        assert_eq!(layout.display_text(), "\na\nb");
        assert_eq!(
            layout.validate(),
            Err(LayoutError::InvalidConfiguration { max_width: 0.0 })
        );
    }

    #[test]
    fn layout_error_display() {
        let err = LayoutError::InvalidConfiguration { max_width: -1.0 };
        assert_eq!(
            err.to_string(),
            "wrap enabled with non-positive max width -1"
        );
        let err = LayoutError::InconsistentState {
            display_chars: 5,
            break_count: 1,
            logical_chars: 5,
        };
        assert!(err.to_string().contains("5 chars, 1 breaks"));
    }
}
