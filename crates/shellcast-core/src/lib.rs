#![forbid(unsafe_code)]

//! Core: scripted terminal demo steps and the sequencer that plays them.
//!
//! # Role in Shellcast
//! `shellcast-core` is the pure state machine. It owns the step model,
//! output line classification, timing configuration, and the
//! [`StepSequencer`] that advances through typing, output and pause phases.
//! It has no clock and no threads.
//!
//! # Primary responsibilities
//! - **Step / OutputLine / Marker**: immutable script data, classified once.
//! - **SequencerConfig**: timing knobs with stock defaults.
//! - **StepSequencer**: phase machine with `next_delay` / `fire` hooks and
//!   deterministic `advance`.
//! - **Snapshot**: owned render-facing view.
//! - **Script** (`script-config` feature): TOML/JSON loading.
//!
//! # How it fits in the system
//! `shellcast-runtime` wraps a sequencer with timers and observers;
//! `shellcast-render` turns snapshots into text.

pub mod config;
pub mod logging;
#[cfg(feature = "script-config")]
pub mod script;
pub mod sequencer;
pub mod state;
pub mod step;

pub use config::{ConfigError, MIN_INTERVAL, SequencerConfig};
#[cfg(feature = "script-config")]
pub use script::{Script, ScriptConfig, ScriptError, StepSpec};
pub use sequencer::{Phase, StepSequencer, Transition};
pub use state::{ActiveCommand, SequencerState, Snapshot};
pub use step::{Marker, OutputLine, Step};
