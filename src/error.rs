//! Error types for admission outcomes.
//!
//! Acquisition has exactly one failure mode surfaced as a value: the call's
//! deadline elapsed before a window had capacity for it. Cancellation is the
//! other exit path, and it takes the native async form (dropping the
//! `acquire` future), so it never appears here and is never conflated with a
//! timeout.

use std::fmt;
use std::time::Duration;

/// Error returned when an `acquire` call was not admitted in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// The configured deadline elapsed while the call was still pending.
    Timeout {
        /// Time spent waiting before giving up.
        elapsed: Duration,
        /// The deadline that was in effect at expiry.
        timeout: Duration,
    },
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { elapsed, timeout } => {
                write!(f, "admission timed out after {:?} (deadline: {:?})", elapsed, timeout)
            }
        }
    }
}

impl std::error::Error for AcquireError {}

impl AcquireError {
    /// Check if this error is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Access timeout details as `(elapsed, timeout)`.
    pub fn timeout_details(&self) -> Option<(Duration, Duration)> {
        match self {
            Self::Timeout { elapsed, timeout } => Some((*elapsed, *timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_includes_durations() {
        let err = AcquireError::Timeout {
            elapsed: Duration::from_millis(55),
            timeout: Duration::from_millis(50),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("timed out"));
        assert!(msg.contains("55"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn timeout_predicates_and_accessors() {
        let err = AcquireError::Timeout {
            elapsed: Duration::from_millis(10),
            timeout: Duration::from_millis(20),
        };
        assert!(err.is_timeout());
        assert_eq!(
            err.timeout_details(),
            Some((Duration::from_millis(10), Duration::from_millis(20)))
        );
    }
}
