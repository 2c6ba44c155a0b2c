#![forbid(unsafe_code)]

//! Reference text renderer for shellcast snapshots.
//!
//! Turns a [`shellcast_core::Snapshot`] into terminal lines: prompt, typed
//! command with a blinking caret, and marker glyphs for output lines.

pub mod renderer;
pub mod width;

pub use renderer::{CaretBlink, DEFAULT_BLINK_INTERVAL, Glyphs, TextRenderer};
pub use width::{display_width, truncate_to_width};
