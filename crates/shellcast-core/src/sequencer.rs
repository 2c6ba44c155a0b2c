#![forbid(unsafe_code)]

//! Step sequencer: the scripted terminal demo state machine.
//!
//! A [`StepSequencer`] walks a fixed list of [`Step`]s. For each step it types
//! the command one grapheme per typing interval, pauses, reveals the output
//! one line per output interval, then waits the step's post delay before
//! moving on. After the last step it either stays on the fully revealed
//! final step ([`Phase::Finished`]) or, when looping, waits and starts over.
//!
//! The sequencer owns no clock. A host asks [`next_delay`](StepSequencer::next_delay)
//! how long to wait, arms a timer, and calls [`fire`](StepSequencer::fire)
//! when it expires. Tests and single-threaded hosts can instead feed virtual
//! time through [`advance`](StepSequencer::advance).
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use shellcast_core::{Phase, SequencerConfig, Step, StepSequencer};
//!
//! let steps = vec![Step::new("ls").line("✓ done").post_delay(Duration::ZERO)];
//! let mut seq = StepSequencer::new(steps, SequencerConfig::default()).unwrap();
//!
//! seq.start();
//! seq.advance(seq.cycle_duration());
//! assert_eq!(seq.phase(), Phase::Finished);
//! assert_eq!(seq.snapshot().active_command.typed, "ls");
//! ```
//!
//! # Invariants
//!
//! 1. `completed_steps` is always the prefix `steps[..step_index]`.
//! 2. `revealed_output_count` stays 0 until the command is fully typed.
//! 3. `typed_length` only grows within a step and returns to 0 on step
//!    change, loop reset, or stop.
//! 4. A loop reset clears every counter in one transition.
//!
//! # Failure Modes
//!
//! - Empty step list or empty command: rejected by [`StepSequencer::new`].
//! - Zero typing/output interval: clamped to
//!   [`MIN_INTERVAL`](crate::config::MIN_INTERVAL).
//! - `fire()` while idle or finished: returns `None`, no state change.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, SequencerConfig};
use crate::state::{ActiveCommand, SequencerState, Snapshot};
use crate::step::Step;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where the sequencer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Not started, or stopped.
    #[default]
    Idle,
    /// Revealing the active command.
    Typing,
    /// Command fully typed; waiting before output.
    PausingBeforeOutput,
    /// Revealing output lines.
    RevealingOutput,
    /// Step fully revealed; waiting its post delay.
    PausingBeforeAdvance,
    /// Last step shown and looping is off.
    Finished,
    /// Last step shown; waiting before starting over.
    PausingBeforeLoopReset,
}

impl Phase {
    /// Whether a timer should be pending in this phase.
    #[inline]
    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Idle | Self::Finished)
    }

    /// Stable snake_case name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Typing => "typing",
            Self::PausingBeforeOutput => "pausing_before_output",
            Self::RevealingOutput => "revealing_output",
            Self::PausingBeforeAdvance => "pausing_before_advance",
            Self::Finished => "finished",
            Self::PausingBeforeLoopReset => "pausing_before_loop_reset",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single [`fire`](StepSequencer::fire) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// One more grapheme typed; more remain.
    Typed { step: usize, typed: usize },
    /// Last grapheme typed; pausing before output.
    FullyTyped { step: usize },
    /// Pause over; output reveal begins.
    OutputStarted { step: usize },
    /// One more output line revealed; more remain.
    LineRevealed { step: usize, revealed: usize },
    /// Step fully revealed (or had no output); waiting the post delay.
    OutputDone { step: usize },
    /// Moved to the next step.
    Advanced { from: usize, to: usize },
    /// Reached the terminal display state.
    Finished { step: usize },
    /// Reached the terminal display state; a loop reset is pending.
    LoopPending { step: usize },
    /// Cleared all progress and restarted at the first step.
    Looped,
}

/// Deterministic scripted command/output sequencer.
pub struct StepSequencer {
    steps: Arc<[Step]>,
    config: SequencerConfig,
    phase: Phase,
    step_index: usize,
    typed_length: usize,
    revealed_output_count: usize,
    /// Virtual time already spent in the current wait (only `advance` uses it).
    wait_elapsed: Duration,
}

impl std::fmt::Debug for StepSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepSequencer")
            .field("step_count", &self.steps.len())
            .field("phase", &self.phase)
            .field("step_index", &self.step_index)
            .field("typed_length", &self.typed_length)
            .field("revealed_output_count", &self.revealed_output_count)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl StepSequencer {
    /// Create a sequencer over `steps`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoSteps`] if `steps` is empty,
    /// [`ConfigError::EmptyCommand`] if any command is empty.
    pub fn new(steps: Vec<Step>, config: SequencerConfig) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::NoSteps);
        }
        if let Some(index) = steps.iter().position(|s| s.command().is_empty()) {
            return Err(ConfigError::EmptyCommand { index });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            steps = steps.len(),
            looping = config.looping,
            "sequencer created"
        );

        Ok(Self {
            steps: steps.into(),
            config,
            phase: Phase::Idle,
            step_index: 0,
            typed_length: 0,
            revealed_output_count: 0,
            wait_elapsed: Duration::ZERO,
        })
    }

    /// The step list.
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Time for one full pass from `start()` to the terminal display state.
    #[must_use]
    pub fn cycle_duration(&self) -> Duration {
        let typing = self.config.effective_typing_interval();
        let output = self.config.effective_output_interval();
        self.steps.iter().fold(Duration::ZERO, |acc, step| {
            acc + typing * step.command_len() as u32
                + self.config.typed_to_output_delay
                + output * step.output_lines().len() as u32
                + self.post_delay_of(step)
        })
    }

    fn post_delay_of(&self, step: &Step) -> Duration {
        step.explicit_post_delay()
            .unwrap_or(self.config.default_post_delay)
    }

    fn active_step(&self) -> &Step {
        &self.steps[self.step_index]
    }

    fn is_last_step(&self) -> bool {
        self.step_index + 1 >= self.steps.len()
    }

    fn clear_progress(&mut self) {
        self.step_index = 0;
        self.typed_length = 0;
        self.revealed_output_count = 0;
        self.wait_elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Playback control
// ---------------------------------------------------------------------------

impl StepSequencer {
    /// Begin typing the first step.
    ///
    /// Only acts from [`Phase::Idle`]; returns `false` (no-op) otherwise.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.clear_progress();
        self.phase = Phase::Typing;
        #[cfg(feature = "tracing")]
        tracing::debug!("sequencer started");
        true
    }

    /// Halt and return to the initial state. Idempotent.
    pub fn stop(&mut self) {
        #[cfg(feature = "tracing")]
        if self.phase != Phase::Idle {
            tracing::debug!(phase = %self.phase, "sequencer stopped");
        }
        self.clear_progress();
        self.phase = Phase::Idle;
    }

    /// Same as [`stop`](Self::stop).
    pub fn reset(&mut self) {
        self.stop();
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a timed transition is pending.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Whether the final step is fully revealed.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished | Phase::PausingBeforeLoopReset)
    }

    /// Owned copy of the progress counters.
    #[must_use]
    pub fn current_state(&self) -> SequencerState {
        SequencerState {
            step_index: self.step_index,
            typed_length: self.typed_length,
            revealed_output_count: self.revealed_output_count,
            completed_steps: self.steps[..self.step_index].to_vec(),
        }
    }

    /// Render-facing view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let step = self.active_step();
        Snapshot {
            phase: self.phase,
            step_index: self.step_index,
            completed_steps: self.steps[..self.step_index].to_vec(),
            active_command: ActiveCommand {
                typed: step.command_prefix(self.typed_length).to_string(),
                typed_len: self.typed_length,
                full_len: step.command_len(),
                caret: self.phase == Phase::Typing,
            },
            active_output_lines: step.output_lines()[..self.revealed_output_count].to_vec(),
            is_finished: self.is_finished(),
        }
    }
}

// ---------------------------------------------------------------------------
// Timed transitions
// ---------------------------------------------------------------------------

impl StepSequencer {
    /// Full length of the wait before the next transition.
    ///
    /// `None` when nothing is pending ([`Phase::Idle`], [`Phase::Finished`]).
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        match self.phase {
            Phase::Idle | Phase::Finished => None,
            Phase::Typing => Some(self.config.effective_typing_interval()),
            Phase::PausingBeforeOutput => Some(self.config.typed_to_output_delay),
            Phase::RevealingOutput => Some(self.config.effective_output_interval()),
            Phase::PausingBeforeAdvance => Some(self.post_delay_of(self.active_step())),
            Phase::PausingBeforeLoopReset => Some(self.config.loop_reset_delay),
        }
    }

    /// Remaining wait before the next transition, after time fed via
    /// [`advance`](Self::advance).
    #[must_use]
    pub fn time_to_next(&self) -> Option<Duration> {
        self.next_delay()
            .map(|d| d.saturating_sub(self.wait_elapsed))
    }

    /// Perform the pending transition immediately.
    ///
    /// Returns `None` when nothing is pending.
    pub fn fire(&mut self) -> Option<Transition> {
        let step = self.step_index;
        let transition = match self.phase {
            Phase::Idle | Phase::Finished => return None,
            Phase::Typing => {
                self.typed_length = (self.typed_length + 1).min(self.active_step().command_len());
                if self.typed_length >= self.active_step().command_len() {
                    self.phase = Phase::PausingBeforeOutput;
                    Transition::FullyTyped { step }
                } else {
                    Transition::Typed {
                        step,
                        typed: self.typed_length,
                    }
                }
            }
            Phase::PausingBeforeOutput => {
                if self.active_step().output_lines().is_empty() {
                    self.phase = Phase::PausingBeforeAdvance;
                    Transition::OutputDone { step }
                } else {
                    self.phase = Phase::RevealingOutput;
                    Transition::OutputStarted { step }
                }
            }
            Phase::RevealingOutput => {
                let total = self.active_step().output_lines().len();
                self.revealed_output_count = (self.revealed_output_count + 1).min(total);
                if self.revealed_output_count >= total {
                    self.phase = Phase::PausingBeforeAdvance;
                    Transition::OutputDone { step }
                } else {
                    Transition::LineRevealed {
                        step,
                        revealed: self.revealed_output_count,
                    }
                }
            }
            Phase::PausingBeforeAdvance => {
                if !self.is_last_step() {
                    self.step_index += 1;
                    self.typed_length = 0;
                    self.revealed_output_count = 0;
                    self.phase = Phase::Typing;
                    Transition::Advanced {
                        from: step,
                        to: self.step_index,
                    }
                } else if self.config.looping {
                    self.phase = Phase::PausingBeforeLoopReset;
                    Transition::LoopPending { step }
                } else {
                    self.phase = Phase::Finished;
                    Transition::Finished { step }
                }
            }
            Phase::PausingBeforeLoopReset => {
                self.clear_progress();
                self.phase = Phase::Typing;
                Transition::Looped
            }
        };
        self.wait_elapsed = Duration::ZERO;

        #[cfg(feature = "tracing")]
        tracing::trace!(?transition, phase = %self.phase, "sequencer transition");

        Some(transition)
    }

    /// Feed `dt` of virtual time, firing every transition that falls due.
    ///
    /// Leftover time after a transition carries into the next wait, so
    /// splitting `dt` into smaller pieces gives the same result.
    /// Returns the number of transitions fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let mut budget = dt;
        let mut fired = 0;
        while let Some(remaining) = self.time_to_next() {
            if budget < remaining {
                self.wait_elapsed += budget;
                break;
            }
            budget -= remaining;
            if self.fire().is_some() {
                fired += 1;
            }
        }
        fired
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Marker;

    const MS_1: Duration = Duration::from_millis(1);
    const MS_10: Duration = Duration::from_millis(10);

    fn fast_config() -> SequencerConfig {
        SequencerConfig::default()
            .typing_interval(MS_10)
            .output_interval(MS_10)
            .typed_to_output_delay(MS_10)
            .default_post_delay(MS_10)
            .loop_reset_delay(MS_10)
    }

    fn seq(steps: Vec<Step>) -> StepSequencer {
        StepSequencer::new(steps, fast_config()).unwrap()
    }

    #[test]
    fn empty_steps_rejected() {
        let err = StepSequencer::new(Vec::new(), SequencerConfig::default()).unwrap_err();
        assert_eq!(err, ConfigError::NoSteps);
    }

    #[test]
    fn empty_command_rejected() {
        let err = StepSequencer::new(vec![Step::new("ls"), Step::new("")], fast_config())
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyCommand { index: 1 });
    }

    #[test]
    fn idle_has_nothing_pending() {
        let mut s = seq(vec![Step::new("ls")]);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.next_delay(), None);
        assert_eq!(s.fire(), None);
        assert_eq!(s.advance(Duration::from_secs(60)), 0);
        assert!(s.current_state().is_initial());
    }

    #[test]
    fn typing_reveals_one_grapheme_per_interval() {
        let mut s = seq(vec![Step::new("abc")]);
        s.start();
        assert_eq!(s.fire(), Some(Transition::Typed { step: 0, typed: 1 }));
        assert_eq!(s.snapshot().active_command.typed, "a");
        assert!(s.snapshot().active_command.caret);
        assert_eq!(s.fire(), Some(Transition::Typed { step: 0, typed: 2 }));
        assert_eq!(s.fire(), Some(Transition::FullyTyped { step: 0 }));
        assert_eq!(s.phase(), Phase::PausingBeforeOutput);
        assert!(!s.snapshot().active_command.caret);
    }

    #[test]
    fn output_waits_for_pause_then_reveals() {
        let mut s = seq(vec![Step::new("x").line("one").line("two")]);
        s.start();
        s.fire(); // typed
        assert_eq!(s.current_state().revealed_output_count, 0);
        assert_eq!(s.fire(), Some(Transition::OutputStarted { step: 0 }));
        assert_eq!(s.current_state().revealed_output_count, 0);
        assert_eq!(
            s.fire(),
            Some(Transition::LineRevealed { step: 0, revealed: 1 })
        );
        assert_eq!(s.fire(), Some(Transition::OutputDone { step: 0 }));
        assert_eq!(s.phase(), Phase::PausingBeforeAdvance);
        assert_eq!(s.snapshot().active_output_lines.len(), 2);
    }

    #[test]
    fn no_output_skips_reveal() {
        let mut s = seq(vec![Step::new("a"), Step::new("b")]);
        s.start();
        s.fire();
        assert_eq!(s.fire(), Some(Transition::OutputDone { step: 0 }));
        assert_eq!(s.fire(), Some(Transition::Advanced { from: 0, to: 1 }));
        assert_eq!(s.current_state().completed_steps.len(), 1);
    }

    #[test]
    fn last_step_stays_active() {
        let mut s = seq(vec![Step::new("ls").line("✓ done").post_delay(Duration::ZERO)]);
        s.start();
        s.advance(s.cycle_duration());
        assert_eq!(s.phase(), Phase::Finished);
        let snap = s.snapshot();
        assert!(snap.is_finished);
        assert!(snap.completed_steps.is_empty());
        assert_eq!(snap.active_command.typed, "ls");
        assert_eq!(snap.active_output_lines[0].marker, Marker::Success);
        assert_eq!(snap.active_output_lines[0].text, "done");
    }

    #[test]
    fn start_is_idempotent() {
        let mut s = seq(vec![Step::new("abc")]);
        assert!(s.start());
        s.fire();
        let before = s.current_state();
        assert!(!s.start());
        assert_eq!(s.current_state(), before);
    }

    #[test]
    fn start_from_finished_is_noop() {
        let mut s = seq(vec![Step::new("a")]);
        s.start();
        s.advance(s.cycle_duration());
        assert_eq!(s.phase(), Phase::Finished);
        assert!(!s.start());
        s.reset();
        assert!(s.start());
    }

    #[test]
    fn stop_returns_to_initial() {
        let mut s = seq(vec![Step::new("a"), Step::new("b").line("x")]);
        s.start();
        s.advance(Duration::from_millis(45));
        assert!(!s.current_state().is_initial());
        s.stop();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.current_state().is_initial());
        assert_eq!(s.time_to_next(), None);
    }

    #[test]
    fn loop_resets_atomically() {
        let mut s = StepSequencer::new(
            vec![Step::new("a"), Step::new("b")],
            fast_config().looping(true),
        )
        .unwrap();
        s.start();
        s.advance(s.cycle_duration());
        assert_eq!(s.phase(), Phase::PausingBeforeLoopReset);
        assert!(s.is_finished());
        assert_eq!(s.current_state().step_index, 1);
        assert_eq!(s.fire(), Some(Transition::Looped));
        assert_eq!(s.phase(), Phase::Typing);
        assert!(s.current_state().is_initial());
    }

    #[test]
    fn advance_carries_leftover_time() {
        let mut whole = seq(vec![Step::new("hello").line("a").line("b")]);
        let mut split = seq(vec![Step::new("hello").line("a").line("b")]);
        whole.start();
        split.start();
        whole.advance(Duration::from_millis(73));
        for _ in 0..73 {
            split.advance(MS_1);
        }
        assert_eq!(whole.current_state(), split.current_state());
        assert_eq!(whole.phase(), split.phase());
        assert_eq!(whole.time_to_next(), split.time_to_next());
    }

    #[test]
    fn zero_intervals_still_terminate_when_looping() {
        let cfg = SequencerConfig::default()
            .typing_interval(Duration::ZERO)
            .output_interval(Duration::ZERO)
            .typed_to_output_delay(Duration::ZERO)
            .default_post_delay(Duration::ZERO)
            .loop_reset_delay(Duration::ZERO)
            .looping(true);
        let mut s = StepSequencer::new(vec![Step::new("ab")], cfg).unwrap();
        s.start();
        let fired = s.advance(Duration::from_millis(10));
        assert!(fired > 0);
        assert!(s.is_running());
    }

    #[test]
    fn default_post_delay_applies_without_output() {
        let s = StepSequencer::new(vec![Step::new("a")], SequencerConfig::default()).unwrap();
        let cfg = s.config();
        assert_eq!(
            s.cycle_duration(),
            cfg.typing_interval + cfg.typed_to_output_delay + cfg.default_post_delay
        );
    }

    #[test]
    fn phase_names() {
        assert_eq!(Phase::PausingBeforeLoopReset.to_string(), "pausing_before_loop_reset");
        assert!(!Phase::Finished.is_running());
        assert!(Phase::PausingBeforeLoopReset.is_running());
    }
}
