#![forbid(unsafe_code)]

//! Text layout core for editable text fields.
//!
//! Reflows raw user text (the *logical* text) into a width-constrained
//! *display* text with synthetic line breaks, and maintains an index-exact,
//! bidirectional mapping between the two, so cursor placement, pointer hit
//! testing, vertical navigation, and multi-line selection highlighting stay
//! correct even though the two strings differ in length and line breaks.
//!
//! The derived display text and break list are pure functions of the logical
//! text and the wrap configuration; [`FieldLayout`] recomputes them eagerly
//! on every change and never patches them incrementally.
//!
//! All indices are `char` offsets, matching what an editing surface tracks
//! for its cursor and selection.
//!
//! # Example
//! ```
//! use fieldtext::{FieldLayout, WrapConfig};
//! use fieldtext_core::FixedMetrics;
//!
//! let metrics = FixedMetrics::new(10.0, 20.0);
//! let mut layout = FieldLayout::new(metrics, WrapConfig::new(115.0));
//! layout.set_text("hello world foo");
//!
//! assert_eq!(layout.display_text(), "hello world \nfoo");
//! assert_eq!(layout.break_indices(), &[12]);
//! // The 'f' of "foo" sits at display offset 13 and logical offset 12.
//! assert_eq!(layout.to_logical(13), 12);
//! assert_eq!(layout.to_display(12), 13);
//! ```

pub mod breaks;
pub mod caret;
pub mod field;
pub mod line;
pub mod mask;
pub mod wrap;

pub use breaks::BreakMap;
pub use field::{FieldLayout, LayoutError, LineSpan};
pub use line::LinePosition;
pub use wrap::{WrapConfig, WrapResult, wrap};
