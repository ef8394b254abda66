#![forbid(unsafe_code)]

//! Substrate for the fieldtext layout engine: pixel geometry primitives and
//! the glyph-metrics interface the engine measures text through.
//!
//! The layout engine never touches a font directly. Everything it knows
//! about rendered text comes through [`FontMetrics`], so the same engine
//! works against a bitmap font, a shaped vector font, or the deterministic
//! [`FixedMetrics`] used in tests and headless environments.

pub mod geometry;
pub mod metrics;

pub use geometry::{Insets, Point, Rect};
pub use metrics::{FixedMetrics, FontMetrics, Glyph};
