#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Turnstile
//!
//! Priority-aware sliding-window rate limiting for async Rust.
//!
//! ## Features
//!
//! - **Sliding window** admitting at most `limit` calls per second
//! - **Priority lanes**: when capacity is scarce, higher-priority callers go
//!   first; equal priorities drain FIFO
//! - **Per-call deadlines** with a distinguishable timeout outcome
//! - **Live tuning**: adjust the limit and the deadline while callers wait
//! - **Tower middleware** for gating a service
//! - **Injectable clock and sleeper** for deterministic tests
//!
//! ## Quick Start
//!
//! ```rust
//! use turnstile::RateLimiter;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let limiter = RateLimiter::new(100).with_timeout(Duration::from_secs(2));
//!
//!     limiter.acquire().await.expect("admitted at baseline priority");
//!     limiter.acquire_priority(5).await.expect("admitted ahead of baseline");
//! }
//! ```

mod admission;
pub mod clock;
pub mod error;
pub mod limiter;
pub mod middleware;
pub mod prelude;
mod registry;
pub mod sleeper;
pub mod tunable;
mod window;

// Re-exports
pub use clock::{Clock, MonotonicClock};
pub use error::AcquireError;
pub use limiter::{RateLimiter, BASELINE_PRIORITY};
pub use middleware::{Gate, GateError, GateLayer, GateService};
pub use sleeper::{InstantSleeper, Sleeper, TokioSleeper, TrackingSleeper};
pub use tunable::Tunable;
