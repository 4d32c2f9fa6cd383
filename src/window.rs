//! The one-second accounting window.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

const WINDOW_MS: u64 = 1_000;

/// Tracks admissions granted within the current window.
///
/// Mutated only inside the limiter's critical section; the fields are atomic
/// so introspective reads can skip the lock entirely. A stale read there is
/// acceptable, a torn one is not.
#[derive(Debug)]
pub(crate) struct WindowCounter {
    started_at_millis: AtomicU64,
    admitted: AtomicU32,
}

impl WindowCounter {
    pub(crate) fn new(now_millis: u64) -> Self {
        Self { started_at_millis: AtomicU64::new(now_millis), admitted: AtomicU32::new(0) }
    }

    /// Reset the window if a full second has elapsed. Returns whether this
    /// call performed the roll.
    ///
    /// Callers must hold the limiter lock: the first caller past the boundary
    /// rolls, every later caller observes the already-rolled state. That is
    /// what makes the reset exactly-once per window transition.
    pub(crate) fn roll_if_elapsed(&self, now_millis: u64) -> bool {
        let started = self.started_at_millis.load(Ordering::Acquire);
        if now_millis.saturating_sub(started) >= WINDOW_MS {
            self.restart(now_millis);
            true
        } else {
            false
        }
    }

    /// Re-anchor the window at `now_millis` with zero admissions.
    pub(crate) fn restart(&self, now_millis: u64) {
        self.admitted.store(0, Ordering::Release);
        self.started_at_millis.store(now_millis, Ordering::Release);
    }

    /// Count one admission; returns the new total. Lock must be held.
    pub(crate) fn record_admission(&self) -> u32 {
        self.admitted.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Admissions granted so far in the current window.
    pub(crate) fn admitted(&self) -> u32 {
        self.admitted.load(Ordering::Acquire)
    }

    /// Time until the current window may roll, floored at 1 ms.
    ///
    /// The floor also covers a clock that already passed the boundary: the
    /// waiter wakes almost immediately and rolls on its next poll.
    pub(crate) fn time_to_roll(&self, now_millis: u64) -> Duration {
        let started = self.started_at_millis.load(Ordering::Acquire);
        let elapsed = now_millis.saturating_sub(started);
        Duration::from_millis(WINDOW_MS.saturating_sub(elapsed).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_roll_within_the_window() {
        let window = WindowCounter::new(0);
        window.record_admission();
        window.record_admission();

        assert!(!window.roll_if_elapsed(999));
        assert_eq!(window.admitted(), 2);
    }

    #[test]
    fn rolls_exactly_once_at_the_boundary() {
        let window = WindowCounter::new(0);
        window.record_admission();

        assert!(window.roll_if_elapsed(1_000));
        assert_eq!(window.admitted(), 0);

        // A second caller observing the same instant sees the rolled state.
        assert!(!window.roll_if_elapsed(1_000));
        assert_eq!(window.admitted(), 0);
    }

    #[test]
    fn roll_reanchors_at_the_observed_instant() {
        let window = WindowCounter::new(0);
        assert!(window.roll_if_elapsed(2_500));
        assert!(!window.roll_if_elapsed(3_400));
        assert!(window.roll_if_elapsed(3_500));
    }

    #[test]
    fn admissions_increase_between_resets() {
        let window = WindowCounter::new(0);
        assert_eq!(window.record_admission(), 1);
        assert_eq!(window.record_admission(), 2);
        assert_eq!(window.record_admission(), 3);
    }

    #[test]
    fn time_to_roll_counts_down_and_floors_at_one_millisecond() {
        let window = WindowCounter::new(0);
        assert_eq!(window.time_to_roll(0), Duration::from_millis(1_000));
        assert_eq!(window.time_to_roll(960), Duration::from_millis(40));
        assert_eq!(window.time_to_roll(1_000), Duration::from_millis(1));
        assert_eq!(window.time_to_roll(5_000), Duration::from_millis(1));
    }
}
