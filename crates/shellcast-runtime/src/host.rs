#![forbid(unsafe_code)]

//! Couples a [`StepSequencer`] to a timer queue and its observers.
//!
//! The host keeps at most one timer armed: the sequencer's next transition.
//! When it fires, the follow-up timer is scheduled relative to the fired
//! deadline rather than the current time, so a late pump never stretches
//! the cadence.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use shellcast_core::{SequencerConfig, Step, StepSequencer};
//! use shellcast_runtime::{SequencerHost, VirtualClock};
//!
//! let seq = StepSequencer::new(vec![Step::new("ls")], SequencerConfig::default()).unwrap();
//! let clock = VirtualClock::new();
//! let mut host = SequencerHost::new(seq, clock.clone());
//!
//! clock.advance(Duration::from_secs(10));
//! host.pump();
//! assert!(host.snapshot().is_finished);
//! ```
//!
//! # Invariants
//!
//! 1. A timer is pending iff the sequencer is running.
//! 2. After `stop()`/`reset()` no timer is pending and the state is initial.
//! 3. Every state change is published to the store and every live observer.

use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use shellcast_core::{Phase, SequencerState, Snapshot, StepSequencer};

use crate::clock::{Clock, VirtualClock};
use crate::store::SnapshotStore;
use crate::timer::{TimerHandle, TimerQueue};

/// Timer-driven owner of one sequencer.
pub struct SequencerHost<C: Clock> {
    sequencer: StepSequencer,
    timers: TimerQueue<C>,
    pending: Option<TimerHandle>,
    observers: Vec<mpsc::Sender<Snapshot>>,
    store: Arc<SnapshotStore>,
    transitions: u64,
}

impl<C: Clock> std::fmt::Debug for SequencerHost<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencerHost")
            .field("phase", &self.sequencer.phase())
            .field("pending", &self.pending)
            .field("observers", &self.observers.len())
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<C: Clock> SequencerHost<C> {
    /// Wrap `sequencer`, starting it right away if its config asks for
    /// `auto_start`.
    pub fn new(sequencer: StepSequencer, clock: C) -> Self {
        let auto_start = sequencer.config().auto_start;
        let store = Arc::new(SnapshotStore::new(sequencer.snapshot()));
        let mut host = Self {
            sequencer,
            timers: TimerQueue::new(clock),
            pending: None,
            observers: Vec::new(),
            store,
            transitions: 0,
        };
        if auto_start {
            host.start();
        }
        host
    }
}

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

impl<C: Clock> SequencerHost<C> {
    /// Start playback from the initial state. No-op unless idle.
    pub fn start(&mut self) -> bool {
        if !self.sequencer.start() {
            return false;
        }
        let now = self.timers.now();
        tracing::debug!(steps = self.sequencer.steps().len(), "host started");
        self.arm(now);
        self.publish();
        true
    }

    /// Cancel the pending timer and return to the initial state.
    ///
    /// Idempotent: stopping an idle host publishes nothing.
    pub fn stop(&mut self) {
        let was_idle = self.sequencer.phase() == Phase::Idle;
        self.disarm();
        self.sequencer.stop();
        if !was_idle {
            tracing::debug!("host stopped");
            self.publish();
        }
    }

    /// Same as [`stop`](Self::stop).
    pub fn reset(&mut self) {
        self.stop();
    }

    /// Fire every timer that is due, in order.
    ///
    /// Returns the number of transitions performed.
    pub fn pump(&mut self) -> usize {
        let mut fired = 0;
        while let Some((handle, deadline)) = self.timers.pop_due() {
            if self.pending != Some(handle) {
                tracing::warn!(timer = handle.id(), "ignoring stale timer");
                continue;
            }
            self.pending = None;
            let Some(transition) = self.sequencer.fire() else {
                continue;
            };
            fired += 1;
            self.transitions += 1;
            tracing::trace!(
                ?transition,
                phase = %self.sequencer.phase(),
                deadline_ms = deadline.as_millis() as u64,
                "transition fired"
            );
            self.arm(deadline);
            self.publish();
        }
        fired
    }

    /// Register an observer. It immediately receives the current snapshot,
    /// then one per state change until the receiver is dropped.
    pub fn subscribe(&mut self) -> mpsc::Receiver<Snapshot> {
        let (tx, rx) = mpsc::channel();
        // A fresh channel cannot be disconnected yet.
        let _ = tx.send(self.sequencer.snapshot());
        self.observers.push(tx);
        tracing::debug!(observers = self.observers.len(), "observer subscribed");
        rx
    }

    fn arm(&mut self, from: Duration) {
        self.disarm();
        if let Some(delay) = self.sequencer.time_to_next() {
            self.pending = Some(self.timers.schedule_at(from.saturating_add(delay)));
        }
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.timers.cancel(handle);
        }
    }

    fn publish(&mut self) {
        let snapshot = self.sequencer.snapshot();
        // Store first: an observer woken by the send must see it in the store.
        self.store.store(snapshot.clone());
        let before = self.observers.len();
        self.observers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        let pruned = before - self.observers.len();
        if pruned > 0 {
            tracing::debug!(pruned, "dropped disconnected observers");
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl<C: Clock> SequencerHost<C> {
    /// The wrapped sequencer.
    #[inline]
    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    /// Owned copy of the progress counters.
    pub fn current_state(&self) -> SequencerState {
        self.sequencer.current_state()
    }

    /// Render-facing view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.sequencer.snapshot()
    }

    /// Wait until the pending timer is due, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Whether a timer is armed.
    #[inline]
    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of pending timers in the queue. At most one.
    #[inline]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Transitions fired since construction.
    #[inline]
    pub fn transitions_fired(&self) -> u64 {
        self.transitions
    }

    /// Shared latest-snapshot store.
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    /// Live observers.
    #[inline]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// The host's clock.
    #[inline]
    pub fn clock(&self) -> &C {
        self.timers.clock()
    }
}

impl SequencerHost<VirtualClock> {
    /// Advance the virtual clock by `dt` and pump.
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.timers.clock().advance(dt);
        self.pump()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
