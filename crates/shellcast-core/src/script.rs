#![forbid(unsafe_code)]

//! Scripts: steps and timing loaded from TOML or JSON.
//!
//! ```toml
//! typing_speed = 40
//! loop = true
//!
//! [[steps]]
//! command = "cargo build"
//! output = ["   Compiling shellcast v0.1.0", "✓ Finished"]
//! post_delay = 500
//!
//! [[steps]]
//! command = "cargo test"
//! output = ["⚠ 1 test ignored"]
//! ```
//!
//! ```rust,ignore
//! let script = Script::from_toml_file("demo.toml")?;
//! let sequencer = script.into_sequencer()?;
//! ```
//!
//! All times are milliseconds. Negative values are clamped to zero; missing
//! values fall back to [`SequencerConfig::default`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SequencerConfig};
use crate::sequencer::StepSequencer;
use crate::step::Step;

/// One step as written in a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Command to type.
    pub command: String,
    /// Raw output lines, classified on conversion.
    #[serde(default)]
    pub output: Vec<String>,
    /// Pause after the step, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_delay: Option<i64>,
}

impl StepSpec {
    /// Convert to a [`Step`], clamping a negative post delay to zero.
    #[must_use]
    pub fn to_step(&self) -> Step {
        let step = Step::new(self.command.clone()).output(&self.output);
        match self.post_delay {
            Some(ms) => step.post_delay_ms(ms),
            None => step,
        }
    }
}

/// Timing and behavior as written in a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Milliseconds per typed character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typing_speed: Option<i64>,
    /// Milliseconds per revealed output line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speed: Option<i64>,
    /// Start as soon as a host takes the sequencer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start: Option<bool>,
    /// Restart after the last step.
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    /// Milliseconds between typing and output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed_to_output_delay: Option<i64>,
    /// Milliseconds before a loop reset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_reset_delay: Option<i64>,
    /// Post delay for steps without one, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_post_delay: Option<i64>,
}

fn clamped_ms(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0).unsigned_abs())
}

impl ScriptConfig {
    /// Resolve against [`SequencerConfig::default`].
    #[must_use]
    pub fn resolve(&self) -> SequencerConfig {
        let base = SequencerConfig::default();
        SequencerConfig {
            typing_interval: self.typing_speed.map_or(base.typing_interval, clamped_ms),
            output_interval: self.output_speed.map_or(base.output_interval, clamped_ms),
            typed_to_output_delay: self
                .typed_to_output_delay
                .map_or(base.typed_to_output_delay, clamped_ms),
            default_post_delay: self
                .default_post_delay
                .map_or(base.default_post_delay, clamped_ms),
            loop_reset_delay: self
                .loop_reset_delay
                .map_or(base.loop_reset_delay, clamped_ms),
            auto_start: self.auto_start.unwrap_or(base.auto_start),
            looping: self.looping.unwrap_or(base.looping),
        }
    }
}

/// A complete scripted demo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Timing and behavior, flattened into the top level of the document.
    #[serde(flatten)]
    pub config: ScriptConfig,
    /// Steps in order.
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

impl Script {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ScriptError> {
        toml::from_str(s).map_err(ScriptError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ScriptError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(s).map_err(ScriptError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ScriptError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ScriptError> {
        toml::to_string_pretty(self).map_err(ScriptError::TomlSerialize)
    }

    /// Resolved configuration.
    #[must_use]
    pub fn sequencer_config(&self) -> SequencerConfig {
        self.config.resolve()
    }

    /// Converted steps.
    #[must_use]
    pub fn to_steps(&self) -> Vec<Step> {
        self.steps.iter().map(StepSpec::to_step).collect()
    }

    /// Build a sequencer from this script.
    pub fn into_sequencer(self) -> Result<StepSequencer, ScriptError> {
        StepSequencer::new(self.to_steps(), self.sequencer_config()).map_err(ScriptError::Config)
    }
}

/// Errors from loading a [`Script`].
#[derive(Debug)]
pub enum ScriptError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// TOML serialization error.
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// The script parsed but describes an invalid sequencer.
    Config(ConfigError),
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Config(e) => write!(f, "invalid script: {e}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::TomlSerialize(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ScriptError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
