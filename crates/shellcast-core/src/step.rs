#![forbid(unsafe_code)]

//! Scripted steps and output line classification.
//!
//! A [`Step`] is one command to type out, the output lines revealed after it,
//! and an optional pause before the next step. Output lines are classified
//! once, at construction, into an [`OutputLine`] carrying a [`Marker`] so the
//! renderer never has to look at raw prefixes.
//!
//! # Marker prefixes
//!
//! | Prefix | Marker |
//! |--------|--------|
//! | `✓` `✔` `√` | [`Marker::Success`] |
//! | `✗` `✘` `×` | [`Marker::Failure`] |
//! | `⚠` (optionally followed by U+FE0F) | [`Marker::Warning`] |
//! | anything else | [`Marker::Plain`] |
//!
//! The prefix and the whitespace right after it are stripped from the text.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

/// Emoji presentation selector that may trail `⚠`.
const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Semantic tag of an output line, used for icon and color selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    /// Line started with a check mark.
    Success,
    /// Line started with a cross.
    Failure,
    /// Line started with a warning sign.
    Warning,
    /// No recognized prefix.
    #[default]
    Plain,
}

impl Marker {
    /// Classify a leading symbol.
    #[must_use]
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '✓' | '✔' | '√' => Some(Self::Success),
            '✗' | '✘' | '×' => Some(Self::Failure),
            '⚠' => Some(Self::Warning),
            _ => None,
        }
    }

    /// Stable lowercase name (`"success"`, `"failure"`, `"warning"`, `"plain"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Warning => "warning",
            Self::Plain => "plain",
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An output line with its marker resolved and prefix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    /// Display text without the marker prefix.
    pub text: String,
    /// Classification derived from the original prefix.
    pub marker: Marker,
}

impl OutputLine {
    /// Classify a raw line.
    ///
    /// Leading whitespace before the symbol is ignored for classification.
    /// Plain lines keep their text untouched.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let mut chars = trimmed.chars();
        let marker = chars.next().and_then(Marker::from_symbol);

        match marker {
            Some(marker) => {
                let mut rest = chars.as_str();
                if marker == Marker::Warning {
                    rest = rest.strip_prefix(VARIATION_SELECTOR_16).unwrap_or(rest);
                }
                Self {
                    text: rest.trim_start().to_string(),
                    marker,
                }
            }
            None => Self {
                text: raw.to_string(),
                marker: Marker::Plain,
            },
        }
    }

    /// Build a plain line without inspecting its prefix.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marker: Marker::Plain,
        }
    }
}

/// One scripted command, its output, and the pause after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    command: String,
    /// Grapheme count of `command`, cached for the typing phase.
    command_len: usize,
    output: Vec<OutputLine>,
    post_delay: Option<Duration>,
}

impl Step {
    /// Create a step with no output and the default post delay.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let command_len = command.graphemes(true).count();
        Self {
            command,
            command_len,
            output: Vec::new(),
            post_delay: None,
        }
    }

    /// Append a raw output line (builder pattern). The line is classified.
    #[must_use]
    pub fn line(mut self, raw: &str) -> Self {
        self.output.push(OutputLine::classify(raw));
        self
    }

    /// Replace the output with the given raw lines (builder pattern).
    #[must_use]
    pub fn output<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.output = lines
            .into_iter()
            .map(|l| OutputLine::classify(l.as_ref()))
            .collect();
        self
    }

    /// Set the pause after the last output line (builder pattern).
    #[must_use]
    pub fn post_delay(mut self, delay: Duration) -> Self {
        self.post_delay = Some(delay);
        self
    }

    /// Set the post delay from signed milliseconds, clamping negatives to zero.
    #[must_use]
    pub fn post_delay_ms(self, ms: i64) -> Self {
        self.post_delay(Duration::from_millis(ms.max(0).unsigned_abs()))
    }

    /// The full command text.
    #[inline]
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Number of grapheme clusters in the command.
    #[inline]
    #[must_use]
    pub fn command_len(&self) -> usize {
        self.command_len
    }

    /// The first `count` graphemes of the command.
    #[must_use]
    pub fn command_prefix(&self, count: usize) -> &str {
        if count >= self.command_len {
            return &self.command;
        }
        let end = self
            .command
            .grapheme_indices(true)
            .nth(count)
            .map_or(self.command.len(), |(idx, _)| idx);
        &self.command[..end]
    }

    /// Classified output lines.
    #[inline]
    #[must_use]
    pub fn output_lines(&self) -> &[OutputLine] {
        &self.output
    }

    /// The explicit post delay, if one was set.
    #[inline]
    #[must_use]
    pub fn explicit_post_delay(&self) -> Option<Duration> {
        self.post_delay
    }
}
