//! The ordered multiset of pending admission tickets.

/// One pending `acquire` call.
///
/// The sequence number makes every ticket unique, so a waiter always inserts
/// and removes exactly its own entry even when priority values collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    pub(crate) priority: u32,
    pub(crate) seq: u64,
}

/// Pending tickets, ordered descending by priority with registration order
/// preserved among equal priorities.
///
/// Owned exclusively by the limiter and only touched under its lock; the raw
/// sequence is never exposed to callers.
#[derive(Debug, Default)]
pub(crate) struct PriorityRegistry {
    entries: Vec<Ticket>,
}

impl PriorityRegistry {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert preserving the descending order. Equal priorities land after
    /// the existing ones, so rank within a priority is registration order.
    pub(crate) fn insert(&mut self, ticket: Ticket) {
        let at = self.entries.partition_point(|e| e.priority >= ticket.priority);
        self.entries.insert(at, ticket);
    }

    /// Remove the exact entry. Idempotent: returns `false` when it is
    /// already gone.
    pub(crate) fn remove(&mut self, ticket: Ticket) -> bool {
        match self.entries.iter().position(|e| e.seq == ticket.seq) {
            Some(at) => {
                self.entries.remove(at);
                true
            }
            None => false,
        }
    }

    /// The highest-priority, earliest-registered pending ticket; `None` when
    /// nothing is waiting.
    pub(crate) fn front(&self) -> Option<Ticket> {
        self.entries.first().copied()
    }

    /// Rank of the caller's own ticket; 0 means next in line. A rank below
    /// `n` is exactly membership in the top-`n` pending entries.
    pub(crate) fn position(&self, ticket: Ticket) -> Option<usize> {
        self.entries.iter().position(|e| e.seq == ticket.seq)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
