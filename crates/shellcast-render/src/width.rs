#![forbid(unsafe_code)]

//! Display-width helpers.
//!
//! Widths are measured per grapheme cluster so emoji sequences and
//! combining marks are never split.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Terminal cells taken by one grapheme cluster.
#[inline]
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_ascii() {
        return grapheme.bytes().filter(|b| !b.is_ascii_control()).count();
    }
    UnicodeWidthStr::width(grapheme)
}

/// Terminal cells taken by `text`.
#[must_use]
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() {
        return grapheme_width(text);
    }
    text.graphemes(true).map(grapheme_width).sum()
}

/// Longest prefix of `text` that fits in `max_width` cells, and its width.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> (&str, usize) {
    let mut byte_end = 0;
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme_width(grapheme);
        if width + w > max_width {
            break;
        }
        width += w;
        byte_end += grapheme.len();
    }
    (&text[..byte_end], width)
}
