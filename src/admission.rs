//! The per-window admission rule.

use crate::registry::{PriorityRegistry, Ticket};
use crate::window::WindowCounter;

/// Outcome of one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    Admitted,
    Denied,
}

/// Decide whether `ticket` may be admitted right now and, if so, perform the
/// admission: count it against the window and drop the ticket from the
/// registry. Denial mutates nothing. Must run under the limiter lock.
///
/// A ticket is admissible when capacity remains and its rank in the registry
/// is below the number of free slots: remaining capacity, granted in strict
/// registry order, reaches it this window. Rank order is priority-descending
/// with registration order among ties, so scarce capacity goes to the
/// highest-priority waiters and baseline callers drain FIFO. Low-priority
/// waiters starve under sustained high-priority load; that trade-off is
/// intentional.
pub(crate) fn try_admit(
    window: &WindowCounter,
    registry: &mut PriorityRegistry,
    limit: u32,
    ticket: Ticket,
) -> Admission {
    let admitted = window.admitted();
    if admitted >= limit {
        // Covers the limit having been lowered below the admitted count:
        // zero free slots, not an error.
        return Admission::Denied;
    }
    let slots = limit - admitted;

    // Head of the queue with a free slot is always admissible; skip the scan.
    let eligible = registry.front().is_some_and(|front| front.seq == ticket.seq)
        || registry.position(ticket).is_some_and(|rank| (rank as u64) < u64::from(slots));

    if eligible {
        registry.remove(ticket);
        let total = window.record_admission();
        tracing::trace!(priority = ticket.priority, admitted = total, limit, "admitted");
        Admission::Admitted
    } else {
        tracing::trace!(priority = ticket.priority, admitted, limit, "denied");
        Admission::Denied
    }
}
