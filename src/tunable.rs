//! Live-tunable limiter settings.
//!
//! The admission limit and the per-call deadline are both adjustable while
//! callers are blocked, and both are read on every poll of every waiter, so
//! reads must stay cheap. Default backend is `ArcSwap` for lock-free reads;
//! the `tunable-rwlock` feature switches to `RwLock` if desired.

use std::sync::Arc;

#[cfg(feature = "tunable-rwlock")]
use std::sync::RwLock;

#[cfg(not(feature = "tunable-rwlock"))]
use arc_swap::ArcSwap;

/// A shared setting with cheap snapshot reads and atomic replacement.
///
/// Writers never block readers; a waiter polling mid-update observes either
/// the old or the new value, never a torn one.
#[derive(Debug)]
pub struct Tunable<T> {
    #[cfg(not(feature = "tunable-rwlock"))]
    inner: Arc<ArcSwap<T>>,
    #[cfg(feature = "tunable-rwlock")]
    inner: Arc<RwLock<T>>,
}

impl<T> Clone for Tunable<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T> Tunable<T> {
    /// Create a new `Tunable` holding `value`.
    pub fn new(value: T) -> Self {
        #[cfg(not(feature = "tunable-rwlock"))]
        {
            Self { inner: Arc::new(ArcSwap::from_pointee(value)) }
        }
        #[cfg(feature = "tunable-rwlock")]
        {
            Self { inner: Arc::new(RwLock::new(value)) }
        }
    }

    /// Snapshot the current value.
    #[cfg(not(feature = "tunable-rwlock"))]
    pub fn get(&self) -> Arc<T> {
        self.inner.load_full()
    }

    /// Snapshot the current value (clone under the RwLock backend).
    #[cfg(feature = "tunable-rwlock")]
    pub fn get(&self) -> Arc<T>
    where
        T: Clone,
    {
        Arc::new(self.inner.read().unwrap().clone())
    }

    /// Replace the value entirely.
    pub fn set(&self, value: T) {
        #[cfg(not(feature = "tunable-rwlock"))]
        {
            self.inner.store(Arc::new(value));
        }
        #[cfg(feature = "tunable-rwlock")]
        {
            *self.inner.write().unwrap() = value;
        }
    }

    /// Replace the value with a function of the current one.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
        T: Clone,
    {
        #[cfg(not(feature = "tunable-rwlock"))]
        {
            let current = self.inner.load_full();
            self.inner.store(Arc::new(f(&current)));
        }
        #[cfg(feature = "tunable-rwlock")]
        {
            let current = self.inner.read().unwrap().clone();
            *self.inner.write().unwrap() = f(&current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Tunable;
    use std::time::Duration;

    #[test]
    fn get_set_update() {
        let limit = Tunable::new(10u32);
        assert_eq!(*limit.get(), 10);
        limit.set(3);
        assert_eq!(*limit.get(), 3);
        limit.update(|l| l.saturating_sub(5));
        assert_eq!(*limit.get(), 0);
    }

    #[test]
    fn holds_optional_durations() {
        let timeout = Tunable::new(None::<Duration>);
        assert_eq!(*timeout.get(), None);
        timeout.set(Some(Duration::from_millis(50)));
        assert_eq!(*timeout.get(), Some(Duration::from_millis(50)));
    }
}
