#![forbid(unsafe_code)]

//! shellcast public facade.
//!
//! Scripted terminal demos: a list of commands is "typed" one character at a
//! time, each followed by its output revealed line by line. This crate
//! re-exports the step model, the timer-driven runtime and the reference
//! renderer, and offers a small prelude.
//!
//! # Usage
//!
//! ```no_run
//! use shellcast::prelude::*;
//!
//! fn main() -> shellcast::Result<()> {
//!     let runner = shellcast::play(
//!         vec![Step::new("ls").line("✓ done")],
//!         SequencerConfig::default(),
//!     )?;
//!     for snapshot in runner.subscribe()? {
//!         println!("{}", TextRenderer::new().render_to_string(&snapshot, Default::default()));
//!         if snapshot.is_finished {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use shellcast_core::{
    ActiveCommand, ConfigError, MIN_INTERVAL, Marker, OutputLine, Phase, SequencerConfig,
    SequencerState, Snapshot, Step, StepSequencer, Transition,
};
#[cfg(feature = "script-config")]
pub use shellcast_core::{Script, ScriptConfig, ScriptError, StepSpec};

// --- Runtime re-exports ----------------------------------------------------

pub use shellcast_runtime::{
    Clock, MonotonicClock, Runner, RunnerError, SequencerHost, SnapshotStore, TimerHandle,
    TimerQueue, VirtualClock,
};

// --- Render re-exports -----------------------------------------------------

pub use shellcast_render::{CaretBlink, Glyphs, TextRenderer};

// --- Entry points ------------------------------------------------------------

/// Validate `steps` and play them on a background thread.
pub fn play(steps: Vec<Step>, config: SequencerConfig) -> Result<Runner> {
    let sequencer = StepSequencer::new(steps, config)?;
    Ok(Runner::spawn(sequencer)?)
}

/// Load a TOML script from disk and play it on a background thread.
#[cfg(feature = "script-config")]
pub fn play_toml_file(path: impl AsRef<std::path::Path>) -> Result<Runner> {
    let sequencer = Script::from_toml_file(path)?.into_sequencer()?;
    Ok(Runner::spawn(sequencer)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, Marker, OutputLine, Phase, Result, Runner, SequencerConfig, SequencerHost, Snapshot,
        Step, StepSequencer, TextRenderer, VirtualClock,
    };

    pub use crate::{core, render, runtime};
}

pub use shellcast_core as core;
pub use shellcast_render as render;
pub use shellcast_runtime as runtime;
