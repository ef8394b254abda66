#![forbid(unsafe_code)]

//! Width-constrained word wrapping with exact break-index bookkeeping.
//!
//! [`wrap`] reflows a logical string into a display string by inserting
//! synthetic `\n` characters so that lines stay inside a pixel width limit.
//! Every inserted break records its display offset, in ascending order, so
//! callers can translate indices between the two strings (see
//! [`BreakMap`](crate::breaks::BreakMap)).
//!
//! User-authored newlines split the text into segments that wrap
//! independently; they are re-emitted verbatim and never appear in the break
//! list.
//!
//! Width checks always measure the whole candidate run through
//! [`FontMetrics::measure`]. Summing per-character widths drifts from what
//! the renderer draws whenever the font kerns or tracks, so it is never done
//! here.
//!
//! # Example
//! ```
//! use fieldtext::wrap::{WrapConfig, wrap};
//! use fieldtext_core::FixedMetrics;
//!
//! let metrics = FixedMetrics::new(10.0, 20.0);
//! let result = wrap("abcdefgh", &WrapConfig::new(45.0), &metrics);
//! assert_eq!(result.display, "abcd\nefgh");
//! assert_eq!(result.breaks, vec![4]);
//! ```

use fieldtext_core::FontMetrics;
use smallvec::SmallVec;

/// Wrap configuration for a text field.
///
/// Changing any field invalidates the derived display text and break list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WrapConfig {
    /// Maximum line width in pixels.
    pub max_width: f32,
    /// Characters after which an oversized word prefers to break, in
    /// preference to a raw mid-word split. Usually empty.
    pub break_chars: SmallVec<[char; 4]>,
    /// Whether wrapping is applied at all.
    pub enabled: bool,
}

impl WrapConfig {
    /// Create a config with the given maximum line width, no preferred
    /// break characters, and wrapping enabled.
    #[must_use]
    pub fn new(max_width: f32) -> Self {
        Self {
            max_width,
            break_chars: SmallVec::new(),
            enabled: true,
        }
    }

    /// Set the preferred break characters.
    #[must_use]
    pub fn break_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.break_chars = chars.into_iter().collect();
        self
    }

    /// Enable or disable wrapping.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Result of reflowing a logical string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrapResult {
    /// The display string: the logical text with synthetic breaks inserted.
    pub display: String,
    /// Ascending display offsets of every synthetic break.
    pub breaks: Vec<usize>,
}

/// Reflow `text` into a display string plus synthetic break offsets.
///
/// Deleting the characters at the returned break offsets from the display
/// string yields `text` back exactly. The function is total: any input
/// terminates, including a `max_width` narrower than a single character
/// (every character then gets its own line).
#[must_use]
pub fn wrap<M: FontMetrics + ?Sized>(text: &str, config: &WrapConfig, metrics: &M) -> WrapResult {
    if !config.enabled || text.is_empty() {
        return WrapResult {
            display: text.to_string(),
            breaks: Vec::new(),
        };
    }

    let mut display = String::with_capacity(text.len());
    let mut breaks: Vec<usize> = Vec::new();
    // Logical characters emitted so far; display offset = logical offset
    // plus the number of breaks already inserted before it.
    let mut processed = 0usize;

    let segments: Vec<&str> = text.split('\n').collect();
    let last = segments.len() - 1;

    for (i, segment) in segments.iter().enumerate() {
        let wrapped = wrap_segment(segment, config, metrics);
        let base = processed + breaks.len();
        display.push_str(&wrapped.display);
        breaks.extend(wrapped.breaks.iter().map(|b| b + base));
        processed += segment.chars().count();

        if i < last {
            display.push('\n');
            processed += 1;
        }
    }

    WrapResult { display, breaks }
}

/// Wrap a single segment (no embedded user newlines).
fn wrap_segment<M: FontMetrics + ?Sized>(
    text: &str,
    config: &WrapConfig,
    metrics: &M,
) -> WrapResult {
    if text.is_empty() {
        return WrapResult::default();
    }

    let words: Vec<&str> = text.split(' ').collect();
    let last = words.len() - 1;
    let space_width = metrics.measure(" ");

    let mut display = String::new();
    let mut breaks: Vec<usize> = Vec::new();
    let mut line_width = 0.0f32;
    let mut processed = 0usize;

    for (i, word) in words.iter().enumerate() {
        let word_width = metrics.measure(word);

        if line_width + word_width < config.max_width {
            display.push_str(word);
            line_width += word_width;
            if i < last {
                display.push(' ');
                line_width += space_width;
                processed += 1;
            }
        } else {
            let (wrapped, word_breaks) = wrap_word(word, line_width, config, metrics);

            let first_line: String = match word_breaks.first() {
                Some(&b) => wrapped.chars().take(b).collect(),
                None => wrapped.clone(),
            };
            let last_line: String = match word_breaks.last() {
                Some(&b) => wrapped.chars().skip(b + 1).collect(),
                None => wrapped.clone(),
            };

            // A word may only be broken in the interior of a line when the
            // break lands on a preferred character; otherwise it restarts on
            // a fresh line and wraps from offset zero.
            if first_line.chars().any(|c| config.break_chars.contains(&c)) || line_width == 0.0 {
                display.push_str(&wrapped);
                line_width = metrics.measure(&last_line);
                let base = processed + breaks.len();
                breaks.extend(word_breaks.iter().map(|b| b + base));
            } else {
                let (rewrapped, re_breaks) = wrap_word(word, 0.0, config, metrics);
                display.push('\n');
                breaks.push(processed + breaks.len());
                display.push_str(&rewrapped);
                let tail: String = match re_breaks.last() {
                    Some(&b) => rewrapped.chars().skip(b + 1).collect(),
                    None => rewrapped.clone(),
                };
                line_width = metrics.measure(&tail);
                let base = processed + breaks.len();
                breaks.extend(re_breaks.iter().map(|b| b + base));
            }

            if i < last {
                display.push(' ');
                processed += 1;
                line_width += space_width;
            }
        }

        processed += word.chars().count();
    }

    WrapResult { display, breaks }
}

/// Break one word that does not fit on the current line.
///
/// `offset` is the width already occupied on the line the word starts on;
/// after the first break the remaining lines start empty. Returned break
/// offsets are relative to the returned string.
fn wrap_word<M: FontMetrics + ?Sized>(
    word: &str,
    mut offset: f32,
    config: &WrapConfig,
    metrics: &M,
) -> (String, Vec<usize>) {
    if word.is_empty() {
        return (String::new(), Vec::new());
    }
    if offset + metrics.measure(word) <= config.max_width {
        return (word.to_string(), Vec::new());
    }

    let mut result = String::new();
    let mut indices: Vec<usize> = Vec::new();
    // Run accumulated since the last preferred break character.
    let mut part = String::new();
    // The whole current line, re-measured as one string on every character.
    let mut line = String::new();
    let mut split_char_seen = false;

    for (i, ch) in word.chars().enumerate() {
        if !indices.is_empty() {
            offset = 0.0;
        }

        line.push(ch);
        if metrics.measure(&line) + offset < config.max_width {
            part.push(ch);
            if config.break_chars.contains(&ch) {
                result.push_str(&part);
                part.clear();
                split_char_seen = true;
            }
        } else {
            let mut carried = 0usize;
            if split_char_seen {
                // Break after the preferred character: the run since it
                // moves down to start the new line.
                result.push('\n');
                result.push_str(&part);
                carried = part.chars().count();
                line.clear();
                line.push_str(&part);
            } else {
                result.push_str(&part);
                result.push('\n');
                line.clear();
            }
            indices.push(i + indices.len() - carried);

            part.clear();
            part.push(ch);
            line.push(ch);
            split_char_seen = false;
        }
    }

    if !part.is_empty() {
        result.push_str(&part);
    }

    (result, indices)
}
