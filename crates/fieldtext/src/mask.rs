#![forbid(unsafe_code)]

//! Masking for single-line (password-style) fields.
//!
//! Substitution is one character for one character, so the masked display
//! text has the same length as the logical text and the index mapping is
//! the identity. No break bookkeeping applies; masked fields are
//! single-line and never word-wrapped.

/// Apply a caller-supplied character substitution uniformly.
#[must_use]
pub fn apply(text: &str, display: impl Fn(char) -> char) -> String {
    text.chars().map(display).collect()
}

/// Replace every character with a fixed masking character.
#[must_use]
pub fn masked(text: &str, mask_char: char) -> String {
    apply(text, |_| mask_char)
}
