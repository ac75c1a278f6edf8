//! The ordered log primitive.
//!
//! The transport that actually moves events between peers is external; the
//! table only needs an append-only sequence every peer observes in the same
//! order. Log implementations are handles: cloning one shares the sequence.

use std::cell::RefCell;
use std::rc::Rc;

use super::event::Event;

/// Append-only, totally ordered event sequence shared by every peer.
pub trait OrderedLog {
    /// Append an entry at the end of the log.
    fn append(&self, event: Event);

    /// Number of entries observed so far.
    fn len(&self) -> usize;

    /// Entry at `index`, if it has arrived.
    fn get(&self, index: usize) -> Option<Event>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process log. Clones share the same entries, which makes it stand in
/// for a transport when several tables run in one process.
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    entries: Rc<RefCell<Vec<Event>>>,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every entry, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<Event> {
        self.entries.borrow().clone()
    }
}

impl OrderedLog for MemoryLog {
    fn append(&self, event: Event) {
        self.entries.borrow_mut().push(event);
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    fn get(&self, index: usize) -> Option<Event> {
        self.entries.borrow().get(index).cloned()
    }
}
