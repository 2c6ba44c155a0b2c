#![forbid(unsafe_code)]

//! Cancellable one-shot timers over a [`Clock`].
//!
//! Timers are ordered by deadline, then by creation order. Cancelling a
//! handle that already fired or was already cancelled is a no-op, so stale
//! handles can never fire.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use crate::clock::Clock;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Raw id, for logs.
    #[inline]
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// One-shot timers ordered by deadline.
pub struct TimerQueue<C: Clock> {
    clock: C,
    next_id: u64,
    queue: BTreeSet<(Duration, TimerHandle)>,
    deadlines: HashMap<TimerHandle, Duration>,
}

impl<C: Clock> std::fmt::Debug for TimerQueue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.queue.len())
            .field("next_deadline", &self.next_deadline())
            .finish_non_exhaustive()
    }
}

impl<C: Clock> TimerQueue<C> {
    /// Empty queue over `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            queue: BTreeSet::new(),
            deadlines: HashMap::new(),
        }
    }

    /// The underlying clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current clock time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule a timer at an absolute clock time.
    pub fn schedule_at(&mut self, deadline: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.queue.insert((deadline, handle));
        self.deadlines.insert(handle, deadline);
        handle
    }

    /// Schedule a timer `delay` from now.
    pub fn schedule_after(&mut self, delay: Duration) -> TimerHandle {
        let deadline = self.now().saturating_add(delay);
        self.schedule_at(deadline)
    }

    /// Cancel a pending timer. Returns `false` if it was not pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => self.queue.remove(&(deadline, handle)),
            None => false,
        }
    }

    /// Whether `handle` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.first().map(|(deadline, _)| *deadline)
    }

    /// Time from now until the earliest pending timer (zero if overdue).
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now()))
    }

    /// Remove and return the earliest timer whose deadline has passed,
    /// together with that deadline.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, Duration)> {
        let now = self.now();
        let &(deadline, handle) = self.queue.first()?;
        if deadline > now {
            return None;
        }
        self.queue.remove(&(deadline, handle));
        self.deadlines.remove(&handle);
        Some((handle, deadline))
    }

    /// Number of pending timers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no timer is pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;

    const MS_10: Duration = Duration::from_millis(10);
    const MS_20: Duration = Duration::from_millis(20);

    fn queue() -> (TimerQueue<VirtualClock>, VirtualClock) {
        let clock = VirtualClock::new();
        (TimerQueue::new(clock.clone()), clock)
    }

    #[test]
    fn nothing_due_before_deadline() {
        let (mut q, clock) = queue();
        q.schedule_after(MS_10);
        clock.advance(Duration::from_millis(9));
        assert_eq!(q.pop_due(), None);
        assert_eq!(q.time_until_next(), Some(Duration::from_millis(1)));
    }

    #[test]
    fn fires_in_deadline_order() {
        let (mut q, clock) = queue();
        let late = q.schedule_after(MS_20);
        let early = q.schedule_after(MS_10);
        clock.advance(MS_20);
        assert_eq!(q.pop_due(), Some((early, MS_10)));
        assert_eq!(q.pop_due(), Some((late, MS_20)));
        assert!(q.is_empty());
    }

    #[test]
    fn same_deadline_keeps_creation_order() {
        let (mut q, clock) = queue();
        let a = q.schedule_at(MS_10);
        let b = q.schedule_at(MS_10);
        clock.advance(MS_10);
        assert_eq!(q.pop_due().map(|(h, _)| h), Some(a));
        assert_eq!(q.pop_due().map(|(h, _)| h), Some(b));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let (mut q, clock) = queue();
        let h = q.schedule_after(MS_10);
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert!(!q.is_pending(h));
        clock.advance(MS_20);
        assert_eq!(q.pop_due(), None);
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let (mut q, clock) = queue();
        let h = q.schedule_after(MS_10);
        clock.advance(MS_10);
        assert!(q.pop_due().is_some());
        assert!(!q.cancel(h));
    }

    #[test]
    fn overdue_reports_zero_wait() {
        let (mut q, clock) = queue();
        q.schedule_after(MS_10);
        clock.advance(MS_20);
        assert_eq!(q.time_until_next(), Some(Duration::ZERO));
    }

    #[test]
    fn clear_drops_everything() {
        let (mut q, _clock) = queue();
        q.schedule_after(MS_10);
        q.schedule_after(MS_20);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }
}
