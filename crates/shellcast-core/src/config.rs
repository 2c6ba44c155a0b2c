#![forbid(unsafe_code)]

//! Sequencer timing and behavior configuration.
//!
//! Every field has a default matching the terminal demo's stock cadence, so
//! `SequencerConfig::default()` types at 50ms per character, reveals a line
//! every 100ms, and pauses 300ms between typing and output.
//!
//! Intervals of zero are accepted but clamped to [`MIN_INTERVAL`] when the
//! sequencer reads them, so each loop cycle consumes time.

use std::time::Duration;

/// Lower bound applied to the typing and output intervals.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Timing and behavior knobs for a [`StepSequencer`](crate::StepSequencer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Delay between two typed characters.
    pub typing_interval: Duration,
    /// Delay between two revealed output lines.
    pub output_interval: Duration,
    /// Pause after the command is fully typed, before output starts.
    pub typed_to_output_delay: Duration,
    /// Post delay for steps that do not set their own.
    pub default_post_delay: Duration,
    /// Pause between the terminal display state and a loop reset.
    pub loop_reset_delay: Duration,
    /// Start as soon as a host takes ownership of the sequencer.
    pub auto_start: bool,
    /// Restart from the first step after finishing.
    pub looping: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            typing_interval: Duration::from_millis(50),
            output_interval: Duration::from_millis(100),
            typed_to_output_delay: Duration::from_millis(300),
            default_post_delay: Duration::from_millis(1000),
            loop_reset_delay: Duration::from_millis(2000),
            auto_start: true,
            looping: false,
        }
    }
}

impl SequencerConfig {
    /// Set the per-character typing interval (builder pattern).
    #[must_use]
    pub fn typing_interval(mut self, interval: Duration) -> Self {
        self.typing_interval = interval;
        self
    }

    /// Set the per-line output interval (builder pattern).
    #[must_use]
    pub fn output_interval(mut self, interval: Duration) -> Self {
        self.output_interval = interval;
        self
    }

    /// Set the pause between typing and output (builder pattern).
    #[must_use]
    pub fn typed_to_output_delay(mut self, delay: Duration) -> Self {
        self.typed_to_output_delay = delay;
        self
    }

    /// Set the fallback post delay (builder pattern).
    #[must_use]
    pub fn default_post_delay(mut self, delay: Duration) -> Self {
        self.default_post_delay = delay;
        self
    }

    /// Set the pause before a loop reset (builder pattern).
    #[must_use]
    pub fn loop_reset_delay(mut self, delay: Duration) -> Self {
        self.loop_reset_delay = delay;
        self
    }

    /// Enable or disable auto start (builder pattern).
    #[must_use]
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Enable or disable looping (builder pattern).
    #[must_use]
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Typing interval with the lower bound applied.
    #[inline]
    #[must_use]
    pub fn effective_typing_interval(&self) -> Duration {
        self.typing_interval.max(MIN_INTERVAL)
    }

    /// Output interval with the lower bound applied.
    #[inline]
    #[must_use]
    pub fn effective_output_interval(&self) -> Duration {
        self.output_interval.max(MIN_INTERVAL)
    }

    /// Report settings that will be adjusted at run time.
    ///
    /// An empty list means every value is used as given.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.typing_interval < MIN_INTERVAL {
            notes.push(format!(
                "typing_interval {:?} is below {:?} and will be clamped",
                self.typing_interval, MIN_INTERVAL
            ));
        }
        if self.output_interval < MIN_INTERVAL {
            notes.push(format!(
                "output_interval {:?} is below {:?} and will be clamped",
                self.output_interval, MIN_INTERVAL
            ));
        }
        notes
    }
}

/// Construction-time failure of a [`StepSequencer`](crate::StepSequencer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The step list was empty.
    NoSteps,
    /// The step at `index` has an empty command.
    EmptyCommand { index: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSteps => write!(f, "sequencer needs at least one step"),
            Self::EmptyCommand { index } => write!(f, "step {index} has an empty command"),
        }
    }
}

impl std::error::Error for ConfigError {}
