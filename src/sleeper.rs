//! Abstraction for the bounded waits between admission attempts.
//!
//! A blocked `acquire` call suspends for at most the time remaining in the
//! current window. Routing that suspension through [`Sleeper`] lets tests
//! observe or skip the waits instead of paying for them in real time.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Suspends the calling task for a bounded duration.
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

/// Production sleeper using the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Test sleeper that completes immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async {})
    }
}

/// Test sleeper that records every requested wait without sleeping.
#[derive(Debug, Clone)]
pub struct TrackingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl TrackingSleeper {
    pub fn new() -> Self {
        Self { waits: Arc::new(Mutex::new(Vec::new())) }
    }

    /// All waits requested so far, in order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.waits.lock().unwrap().clear();
    }
}

impl Default for TrackingSleeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Sleeper for TrackingSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        self.waits.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn instant_sleeper_returns_immediately() {
        let start = std::time::Instant::now();
        InstantSleeper.sleep(Duration::from_secs(5)).await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn tracking_sleeper_records_waits_in_order() {
        let sleeper = TrackingSleeper::new();
        sleeper.sleep(Duration::from_millis(40)).await;
        sleeper.sleep(Duration::from_millis(960)).await;

        assert_eq!(
            sleeper.waits(),
            vec![Duration::from_millis(40), Duration::from_millis(960)]
        );

        sleeper.clear();
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_sleeper_waits_the_requested_duration() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(250)).await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
