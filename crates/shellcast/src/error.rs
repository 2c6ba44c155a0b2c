#![forbid(unsafe_code)]

//! Top-level error type.
//!
//! Each crate keeps its own typed error; this enum only wraps them so an
//! application can use one `Result` across loading, building and running.

use std::fmt;

use shellcast_core::ConfigError;
#[cfg(feature = "script-config")]
use shellcast_core::ScriptError;
use shellcast_runtime::RunnerError;

/// Any error raised by shellcast.
#[derive(Debug)]
pub enum Error {
    /// Invalid step list.
    Config(ConfigError),
    /// Script file could not be read or parsed.
    #[cfg(feature = "script-config")]
    Script(ScriptError),
    /// Background playback failed.
    Runner(RunnerError),
}

/// Standard result type for shellcast APIs.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "script-config")]
            Self::Script(err) => write!(f, "{err}"),
            Self::Runner(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            #[cfg(feature = "script-config")]
            Self::Script(err) => Some(err),
            Self::Runner(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "script-config")]
impl From<ScriptError> for Error {
    fn from(err: ScriptError) -> Self {
        Self::Script(err)
    }
}

impl From<RunnerError> for Error {
    fn from(err: RunnerError) -> Self {
        Self::Runner(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_passes_through() {
        let err: Error = ConfigError::NoSteps.into();
        assert_eq!(err.to_string(), "sequencer needs at least one step");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn runner_error_passes_through() {
        let err: Error = RunnerError::Disconnected.into();
        assert!(matches!(err, Error::Runner(RunnerError::Disconnected)));
    }

    #[cfg(feature = "script-config")]
    #[test]
    fn script_error_keeps_config_cause() {
        let err: Error = ScriptError::from(ConfigError::EmptyCommand { index: 2 }).into();
        assert_eq!(err.to_string(), "invalid script: step 2 has an empty command");
    }
}
