//! The rate limiter facade.
//!
//! Semantics:
//! - At most `limit` admissions are granted per rolling one-second window.
//! - A blocked call registers a ticket and re-polls once per window (or
//!   sooner when its deadline is closer), so scarce capacity is handed out
//!   in priority order, FIFO among equal priorities.
//! - `set_limit` / `set_timeout` publish immediately and are observed at
//!   every waiter's next poll; nobody is forcibly woken.
//! - Every exit path deregisters the ticket: admission removes it under the
//!   lock, timeout and future-drop (cancellation) remove it via the
//!   registration guard. No phantom entries bias later windows.
//!
//! Invariants:
//! - Registry mutation, window roll, and the admission decision are
//!   serialized under one lock; the lock is never held across an `.await`.
//! - The window rolls exactly once per transition; admissions only push the
//!   count past the limit if the limit was lowered mid-window.

use crate::admission::{try_admit, Admission};
use crate::clock::{Clock, MonotonicClock};
use crate::error::AcquireError;
use crate::registry::{PriorityRegistry, Ticket};
use crate::sleeper::{Sleeper, TokioSleeper};
use crate::tunable::Tunable;
use crate::window::WindowCounter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Priority used by [`RateLimiter::acquire`]; the lowest rank. Elevated
/// callers pass any larger value to [`RateLimiter::acquire_priority`].
pub const BASELINE_PRIORITY: u32 = 0;

#[derive(Debug)]
struct Shared {
    window: WindowCounter,
    registry: Mutex<PriorityRegistry>,
    limit: Tunable<u32>,
    timeout: Tunable<Option<Duration>>,
    next_seq: AtomicU64,
}

/// A shared admission gate bounding calls per one-second window, with
/// priority lanes for scarce capacity.
///
/// Clones share the same underlying state via `Arc`: hand one handle to each
/// task and they all draw from the same window.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl RateLimiter {
    /// Create a limiter admitting at most `limit` calls per window. Callers
    /// wait indefinitely until [`with_timeout`](Self::with_timeout) or
    /// [`set_timeout`](Self::set_timeout) sets a deadline.
    pub fn new(limit: u32) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::default());
        let now = clock.now_millis();
        Self {
            shared: Arc::new(Shared {
                window: WindowCounter::new(now),
                registry: Mutex::new(PriorityRegistry::new()),
                limit: Tunable::new(limit),
                timeout: Tunable::new(None),
                next_seq: AtomicU64::new(0),
            }),
            clock,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Set the per-call deadline. Builder-style; see also
    /// [`set_timeout`](Self::set_timeout).
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.shared.timeout.set(Some(timeout));
        self
    }

    /// Override the clock (useful for deterministic tests). Re-anchors the
    /// current window at the new clock's present; apply before sharing the
    /// limiter.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self.shared.window.restart(self.clock.now_millis());
        self
    }

    /// Override how blocked callers wait between polls (useful for tests).
    pub fn with_sleeper<S: Sleeper + 'static>(mut self, sleeper: S) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Acquire one admission at baseline priority.
    ///
    /// Blocks until a window has capacity for this caller, or until the
    /// configured deadline elapses.
    pub async fn acquire(&self) -> Result<(), AcquireError> {
        self.acquire_priority(BASELINE_PRIORITY).await
    }

    /// Acquire one admission at `priority`; higher values win when capacity
    /// is scarce.
    ///
    /// # Behavior
    /// Registers the caller, then polls once per window: roll the window if
    /// due, attempt admission, otherwise sleep until the earlier of the next
    /// roll and the deadline. Admission removes the registration and returns.
    /// Within one window, remaining capacity goes to the highest-priority
    /// waiters, registration order among ties; a window where elevated
    /// traffic fills every slot admits no baseline caller at all.
    ///
    /// # Errors
    /// Returns [`AcquireError::Timeout`] when the deadline set via
    /// [`with_timeout`](Self::with_timeout) / [`set_timeout`](Self::set_timeout)
    /// elapses first. A zero deadline degenerates to a single admission
    /// attempt.
    ///
    /// # Cancellation
    /// Dropping the returned future deregisters the caller; no phantom entry
    /// remains to bias later admission decisions.
    pub async fn acquire_priority(&self, priority: u32) -> Result<(), AcquireError> {
        struct Registration<'a> {
            shared: &'a Shared,
            ticket: Ticket,
            armed: bool,
        }

        impl Drop for Registration<'_> {
            fn drop(&mut self) {
                if self.armed {
                    if let Ok(mut registry) = self.shared.registry.lock() {
                        registry.remove(self.ticket);
                    }
                }
            }
        }

        let started = self.clock.now_millis();
        let ticket = Ticket {
            priority,
            seq: self.shared.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.shared.registry.lock().unwrap().insert(ticket);
        let mut registration = Registration { shared: &self.shared, ticket, armed: true };

        loop {
            let now = self.clock.now_millis();
            let wait = {
                let mut registry = self.shared.registry.lock().unwrap();
                if self.shared.window.roll_if_elapsed(now) {
                    tracing::debug!(pending = registry.len(), "window rolled");
                }
                let limit = *self.shared.limit.get();
                match try_admit(&self.shared.window, &mut registry, limit, ticket) {
                    Admission::Admitted => {
                        registration.armed = false;
                        return Ok(());
                    }
                    Admission::Denied => self.shared.window.time_to_roll(now),
                }
            };

            let wait = match *self.shared.timeout.get() {
                None => wait,
                Some(timeout) => {
                    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                    let elapsed = now.saturating_sub(started);
                    if elapsed >= timeout_ms {
                        tracing::debug!(priority, elapsed_ms = elapsed, "admission timed out");
                        return Err(AcquireError::Timeout {
                            elapsed: Duration::from_millis(elapsed),
                            timeout,
                        });
                    }
                    wait.min(Duration::from_millis(timeout_ms - elapsed))
                }
            };

            self.sleeper.sleep(wait).await;
        }
    }

    /// Replace the per-window admission limit. Takes effect at every
    /// waiter's next poll.
    pub fn set_limit(&self, limit: u32) {
        self.shared.limit.set(limit);
        tracing::debug!(limit, "limit updated");
    }

    /// Raise the limit by `delta`, saturating.
    pub fn increase_limit(&self, delta: u32) {
        self.shared.limit.update(|limit| limit.saturating_add(delta));
    }

    /// Lower the limit by `delta`, saturating at zero. Lowering it below the
    /// current window's admitted count is legal and simply leaves no free
    /// slots until the next roll.
    pub fn decrease_limit(&self, delta: u32) {
        self.shared.limit.update(|limit| limit.saturating_sub(delta));
    }

    /// Replace the per-call deadline; `None` waits indefinitely. Applies to
    /// in-flight calls at their next poll.
    pub fn set_timeout(&self, timeout: Option<Duration>) {
        self.shared.timeout.set(timeout);
    }

    /// The current per-window admission limit.
    pub fn limit(&self) -> u32 {
        *self.shared.limit.get()
    }

    /// The current per-call deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        *self.shared.timeout.get()
    }

    /// Admissions granted so far in the current window. May lag by one roll
    /// while no caller is polling; reads take no lock.
    pub fn admitted_in_window(&self) -> u32 {
        self.shared.window.admitted()
    }

    /// Number of calls currently blocked in `acquire`.
    pub fn pending_waiters(&self) -> usize {
        self.shared.registry.lock().unwrap().len()
    }
}
