//! Last-write-wins holder for overlapping searches.
//!
//! Each search takes a ticket before it starts. When it finishes it offers
//! its result with that ticket; the result is kept only if no newer ticket
//! has already been applied, so a slow stale search can never overwrite a
//! fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    #[must_use]
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Applied<T> {
    ticket: SearchTicket,
    value: T,
}

#[derive(Debug)]
pub struct SearchSession<T> {
    issued: AtomicU64,
    applied: Mutex<Option<Applied<T>>>,
}

impl<T> Default for SearchSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchSession<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            applied: Mutex::new(None),
        }
    }

    /// Issue the next ticket. Tickets strictly increase.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Offer a finished search's value. Returns `true` if it was applied.
    pub fn apply(&self, ticket: SearchTicket, value: T) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if applied.as_ref().is_some_and(|current| current.ticket >= ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale search result");
            return false;
        }
        *applied = Some(Applied { ticket, value });
        true
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    pub fn applied_ticket(&self) -> Option<SearchTicket> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|current| current.ticket)
    }

    /// The value of the newest applied search.
    pub fn latest(&self) -> Option<T>
    where
        T: Clone,
    {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|current| current.value.clone())
    }
}
