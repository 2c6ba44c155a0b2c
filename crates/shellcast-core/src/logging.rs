#![forbid(unsafe_code)]

//! Logging helpers.
//!
//! With the `tracing` feature the sequencer emits `debug` events for
//! lifecycle changes (create, start, stop) and `trace` events for every
//! timed transition. Without it, no logging code is compiled in.
//!
//! The `tracing-json` feature adds [`init_json_logging`], which installs a
//! JSON formatter filtered by `RUST_LOG` (default `info`).

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .is_ok()
}
