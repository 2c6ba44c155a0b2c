#![forbid(unsafe_code)]

//! Read-only views of sequencer progress.
//!
//! [`SequencerState`] is the raw counter view; [`Snapshot`] is what a
//! renderer consumes. Both are owned values, so observers on other threads
//! can hold them without borrowing the sequencer.

use crate::sequencer::Phase;
use crate::step::{OutputLine, Step};

/// Raw progress counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencerState {
    /// Index of the active step.
    pub step_index: usize,
    /// Graphemes of the active command revealed so far.
    pub typed_length: usize,
    /// Output lines of the active step revealed so far.
    pub revealed_output_count: usize,
    /// Steps fully finished, in order. Always `step_index` long.
    pub completed_steps: Vec<Step>,
}

impl SequencerState {
    /// The state every sequencer starts in and returns to on reset.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    /// Whether this equals [`SequencerState::initial`].
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.step_index == 0
            && self.typed_length == 0
            && self.revealed_output_count == 0
            && self.completed_steps.is_empty()
    }
}

/// The command line currently being typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveCommand {
    /// Typed-so-far prefix of the command.
    pub typed: String,
    /// Graphemes revealed.
    pub typed_len: usize,
    /// Graphemes in the whole command.
    pub full_len: usize,
    /// Whether the renderer should draw a (blinking) caret after `typed`.
    pub caret: bool,
}

impl ActiveCommand {
    /// Whether the whole command has been revealed.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.typed_len >= self.full_len
    }
}

/// Render-facing view of a sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Phase at the time of the snapshot.
    pub phase: Phase,
    /// Index of the active step.
    pub step_index: usize,
    /// History shown above the active step.
    pub completed_steps: Vec<Step>,
    /// The active command line.
    pub active_command: ActiveCommand,
    /// Revealed output lines of the active step.
    pub active_output_lines: Vec<OutputLine>,
    /// The last step is fully revealed and no further step will follow
    /// before a loop reset.
    pub is_finished: bool,
}

impl Snapshot {
    /// Snapshot of a sequencer that has not started.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            step_index: 0,
            completed_steps: Vec::new(),
            active_command: ActiveCommand::default(),
            active_output_lines: Vec::new(),
            is_finished: false,
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::idle()
    }
}
