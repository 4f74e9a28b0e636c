//! Ordering for overlapping requests within one widget.
//!
//! Every submit takes a [`Ticket`]. A response is applied only when its ticket
//! is the newest one issued and newer than whatever was last applied, so a slow
//! earlier response can never overwrite a later one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Counters {
    issued: u64,
    applied: u64,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    counters: Mutex<Counters>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        let mut counters = self.counters.lock().expect("sequencer lock poisoned");
        counters.issued += 1;
        Ticket(counters.issued)
    }

    /// Claims the view for `ticket`. Returns `false` when the response is stale.
    pub fn commit(&self, ticket: Ticket) -> bool {
        let mut counters = self.counters.lock().expect("sequencer lock poisoned");
        if ticket.0 == counters.issued && ticket.0 > counters.applied {
            counters.applied = ticket.0;
            true
        } else {
            false
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.counters.lock().expect("sequencer lock poisoned").issued == ticket.0
    }

    pub fn last_applied(&self) -> Option<Ticket> {
        let applied = self.counters.lock().expect("sequencer lock poisoned").applied;
        (applied > 0).then_some(Ticket(applied))
    }
}

/// Submit control. Disabled while any request holds a [`TriggerGuard`].
#[derive(Debug, Clone, Default)]
pub struct Trigger {
    in_flight: Arc<AtomicUsize>,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engage(&self) -> TriggerGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        TriggerGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) == 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
#[must_use = "the trigger re-enables as soon as the guard is dropped"]
pub struct TriggerGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for TriggerGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
