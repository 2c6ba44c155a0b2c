#![forbid(unsafe_code)]

//! Timer-driven hosting for shellcast sequencers.
//!
//! [`SequencerHost`] couples a [`shellcast_core::StepSequencer`] to a
//! [`TimerQueue`] so transitions fire at their deadlines; [`Runner`] does the
//! same on a background thread against the wall clock.

pub mod clock;
pub mod host;
pub mod runner;
pub mod store;
pub mod timer;

pub use clock::{Clock, MonotonicClock, VirtualClock};
pub use host::SequencerHost;
pub use runner::{Runner, RunnerError};
pub use store::SnapshotStore;
pub use timer::{TimerHandle, TimerQueue};
