//! Host lifecycle tests on a virtual clock.
//!
//! ## Invariants
//!
//! 1. Stopping leaves no pending timer, and nothing fires afterwards.
//! 2. A stale handle is never fired by the host.
//! 3. Driving the host with a virtual clock matches `StepSequencer::advance`.
//! 4. Observers see every transition in order.

use std::time::Duration;

use proptest::prelude::*;
use shellcast_core::{Phase, SequencerConfig, Step, StepSequencer};
use shellcast_runtime::{Clock, SequencerHost, TimerQueue, VirtualClock};

fn demo_steps() -> Vec<Step> {
    vec![
        Step::new("cargo build").line("✓ Finished dev profile"),
        Step::new("cargo test")
            .line("running 3 tests")
            .line("✗ 1 failed")
            .post_delay(Duration::from_millis(250)),
    ]
}

fn manual() -> SequencerConfig {
    SequencerConfig::default().auto_start(false)
}

// ── 1. Stop cancels ────────────────────────────────────────────────────────

#[test]
fn stop_mid_run_cancels_pending_timer() {
    let clock = VirtualClock::new();
    let seq = StepSequencer::new(demo_steps(), manual()).unwrap();
    let mut host = SequencerHost::new(seq, clock.clone());
    host.start();
    host.advance(Duration::from_millis(777));
    assert!(host.has_pending_timer());

    host.stop();
    assert_eq!(host.pending_timers(), 0);
    assert_eq!(host.time_until_next(), None);

    let fired_before = host.transitions_fired();
    clock.advance(Duration::from_secs(120));
    assert_eq!(host.pump(), 0);
    assert_eq!(host.transitions_fired(), fired_before);
    assert_eq!(host.phase(), Phase::Idle);
    assert!(host.snapshot().completed_steps.is_empty());
}

#[test]
fn restart_after_stop_begins_from_step_zero() {
    let seq = StepSequencer::new(demo_steps(), manual()).unwrap();
    let mut host = SequencerHost::new(seq, VirtualClock::new());
    host.start();
    host.advance(Duration::from_secs(3));
    assert_eq!(host.current_state().step_index, 1);

    host.reset();
    host.start();
    host.advance(Duration::from_millis(50));
    let snap = host.snapshot();
    assert_eq!(snap.step_index, 0);
    assert_eq!(snap.active_command.typed, "c");
}

#[test]
fn stop_twice_publishes_once() {
    let seq = StepSequencer::new(demo_steps(), manual()).unwrap();
    let mut host = SequencerHost::new(seq, VirtualClock::new());
    host.start();
    let store = host.store();
    host.stop();
    let v = store.version();
    host.stop();
    assert_eq!(store.version(), v);
}

// ── 2. Stale handles ───────────────────────────────────────────────────────

#[test]
fn stale_handle_cancel_is_ignored() {
    let clock = VirtualClock::new();
    let mut timers = TimerQueue::new(clock.clone());
    let first = timers.schedule_after(Duration::from_millis(5));
    clock.advance(Duration::from_millis(5));
    assert_eq!(timers.pop_due().map(|(h, _)| h), Some(first));

    let second = timers.schedule_after(Duration::from_millis(5));
    assert!(!timers.cancel(first), "fired handle must not cancel others");
    assert!(timers.is_pending(second));
}

#[test]
fn stopped_run_never_fires_old_deadlines() {
    let clock = VirtualClock::new();
    let seq = StepSequencer::new(demo_steps(), manual()).unwrap();
    let mut host = SequencerHost::new(seq, clock.clone());
    host.start();
    clock.advance(Duration::from_millis(30));
    host.stop();
    host.start();
    // The first run's deadline at 50 ms passes without firing.
    clock.advance(Duration::from_millis(20));
    assert_eq!(host.pump(), 0);
    assert_eq!(host.snapshot().active_command.typed, "");
    clock.advance(Duration::from_millis(30));
    assert_eq!(host.pump(), 1);
    assert_eq!(host.snapshot().active_command.typed, "c");
}

// ── 3. Host matches sequencer ─────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn host_matches_sequencer_advance(
        chunks in prop::collection::vec(0u64..400, 1..40),
        looping in any::<bool>(),
    ) {
        let cfg = manual().looping(looping);
        let mut reference = StepSequencer::new(demo_steps(), cfg.clone()).unwrap();
        let clock = VirtualClock::new();
        let mut host = SequencerHost::new(
            StepSequencer::new(demo_steps(), cfg).unwrap(),
            clock.clone(),
        );
        reference.start();
        host.start();

        for ms in chunks {
            let dt = Duration::from_millis(ms);
            let expected = reference.advance(dt);
            clock.advance(dt);
            prop_assert_eq!(host.pump(), expected);
            prop_assert_eq!(host.phase(), reference.phase());
            prop_assert_eq!(host.current_state(), reference.current_state());
            prop_assert_eq!(host.time_until_next(), reference.time_to_next());
        }
        prop_assert!(host.pending_timers() <= 1);
        prop_assert_eq!(host.has_pending_timer(), host.phase().is_running());
    }
}

// ── 4. Observers ──────────────────────────────────────────────────────────

#[test]
fn observer_sees_every_transition() {
    let clock = VirtualClock::new();
    let seq = StepSequencer::new(demo_steps(), manual()).unwrap();
    let cycle = seq.cycle_duration();
    let mut host = SequencerHost::new(seq, clock.clone());
    let rx = host.subscribe();
    host.start();
    let fired = host.advance(cycle);
    assert_eq!(host.phase(), Phase::Finished);
    assert_eq!(clock.now(), cycle);

    let snapshots: Vec<_> = rx.try_iter().collect();
    // Initial + start + one per transition.
    assert_eq!(snapshots.len(), 2 + fired);
    assert_eq!(snapshots[0].phase, Phase::Idle);
    assert!(snapshots.last().unwrap().is_finished);
    for pair in snapshots.windows(2) {
        assert!(pair[1].step_index >= pair[0].step_index);
    }
}
