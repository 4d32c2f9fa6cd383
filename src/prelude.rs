//! Convenient re-exports for common Turnstile types.
pub use crate::{
    clock::{Clock, MonotonicClock},
    error::AcquireError,
    limiter::{RateLimiter, BASELINE_PRIORITY},
    middleware::{Gate, GateError, GateLayer, GateService},
    sleeper::{InstantSleeper, Sleeper, TokioSleeper, TrackingSleeper},
    tunable::Tunable,
};
