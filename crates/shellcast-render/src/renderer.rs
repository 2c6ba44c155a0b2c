#![forbid(unsafe_code)]

//! Plain-text rendering of sequencer snapshots.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use shellcast_core::{SequencerConfig, Step, StepSequencer};
//! use shellcast_render::TextRenderer;
//!
//! let mut seq = StepSequencer::new(
//!     vec![Step::new("ls").line("✓ done")],
//!     SequencerConfig::default(),
//! )
//! .unwrap();
//! seq.start();
//! seq.advance(seq.cycle_duration());
//!
//! let lines = TextRenderer::new().render(&seq.snapshot(), Duration::ZERO);
//! assert_eq!(lines, vec!["$ ls".to_string(), "✓ done".to_string()]);
//! ```

use std::time::Duration;

use shellcast_core::{Marker, OutputLine, Snapshot};

use crate::width::{display_width, truncate_to_width};

/// Default blink period of the caret.
pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(530);

// ---------------------------------------------------------------------------
// Caret
// ---------------------------------------------------------------------------

/// Square-wave caret visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretBlink {
    interval: Duration,
}

impl CaretBlink {
    /// Toggle every `interval`. A zero interval never blinks.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Half period.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the caret is drawn at `elapsed`. Starts visible.
    #[must_use]
    pub fn visible(&self, elapsed: Duration) -> bool {
        if self.interval.is_zero() {
            return true;
        }
        (elapsed.as_nanos() / self.interval.as_nanos()) % 2 == 0
    }
}

impl Default for CaretBlink {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_INTERVAL)
    }
}

// ---------------------------------------------------------------------------
// Glyphs
// ---------------------------------------------------------------------------

/// Prefix drawn before classified output lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    pub success: String,
    pub failure: String,
    pub warning: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            success: "✓".into(),
            failure: "✗".into(),
            warning: "⚠".into(),
        }
    }
}

impl Glyphs {
    /// ASCII fallbacks for terminals without symbol fonts.
    #[must_use]
    pub fn ascii() -> Self {
        Self {
            success: "[ok]".into(),
            failure: "[fail]".into(),
            warning: "[warn]".into(),
        }
    }

    /// Glyph for `marker`; plain lines have none.
    #[must_use]
    pub fn for_marker(&self, marker: Marker) -> Option<&str> {
        match marker {
            Marker::Success => Some(&self.success),
            Marker::Failure => Some(&self.failure),
            Marker::Warning => Some(&self.warning),
            Marker::Plain => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders a [`Snapshot`] as terminal lines.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    prompt: String,
    caret: String,
    blink: CaretBlink,
    width: Option<usize>,
    glyphs: Glyphs,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            prompt: "$ ".into(),
            caret: "▋".into(),
            blink: CaretBlink::default(),
            width: None,
            glyphs: Glyphs::default(),
        }
    }
}

impl TextRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn caret(mut self, caret: impl Into<String>) -> Self {
        self.caret = caret.into();
        self
    }

    #[must_use]
    pub fn blink_interval(mut self, interval: Duration) -> Self {
        self.blink = CaretBlink::new(interval);
        self
    }

    /// Clip every line to `columns` display cells.
    #[must_use]
    pub fn width(mut self, columns: usize) -> Self {
        self.width = Some(columns);
        self
    }

    #[must_use]
    pub fn glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Caret blink helper in use.
    #[must_use]
    pub fn blink(&self) -> CaretBlink {
        self.blink
    }

    /// Render `snapshot`; `elapsed` drives the caret blink.
    ///
    /// Completed steps come first, each as a prompt line followed by its
    /// output. The active step follows with only its typed prefix and its
    /// revealed lines.
    #[must_use]
    pub fn render(&self, snapshot: &Snapshot, elapsed: Duration) -> Vec<String> {
        let mut lines = Vec::new();
        for step in &snapshot.completed_steps {
            lines.push(self.clip(format!("{}{}", self.prompt, step.command())));
            lines.extend(step.output_lines().iter().map(|l| self.output_line(l)));
        }

        let active = &snapshot.active_command;
        let mut prompt_line = format!("{}{}", self.prompt, active.typed);
        if active.caret && self.blink.visible(elapsed) {
            prompt_line.push_str(&self.caret);
        }
        lines.push(self.clip(prompt_line));
        lines.extend(
            snapshot
                .active_output_lines
                .iter()
                .map(|l| self.output_line(l)),
        );
        lines
    }

    /// Render and join with newlines.
    #[must_use]
    pub fn render_to_string(&self, snapshot: &Snapshot, elapsed: Duration) -> String {
        self.render(snapshot, elapsed).join("\n")
    }

    /// One output line with its glyph.
    #[must_use]
    pub fn output_line(&self, line: &OutputLine) -> String {
        let text = match self.glyphs.for_marker(line.marker) {
            Some(glyph) => format!("{glyph} {}", line.text),
            None => line.text.clone(),
        };
        self.clip(text)
    }

    fn clip(&self, line: String) -> String {
        match self.width {
            Some(max) if display_width(&line) > max => truncate_to_width(&line, max).0.to_string(),
            _ => line,
        }
    }
}
