use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Post(String),
    Reel(String),
    User(String),
}

/// Proof that a mutation was issued, ordered against later mutations of
/// the same entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    key: EntityKey,
    seq: u64,
}

/// Hands out monotonically increasing sequence numbers per entity so
/// responses that arrive after a newer mutation can be recognised as stale.
#[derive(Debug, Default)]
pub struct Sequencer {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next: u64,
    latest: HashMap<EntityKey, u64>,
}

impl Sequencer {
    pub fn begin(&self, key: EntityKey) -> Ticket {
        let mut inner = self.lock();
        inner.next += 1;
        let seq = inner.next;
        inner.latest.insert(key.clone(), seq);
        Ticket { key, seq }
    }

    #[cfg(test)]
    fn is_current(&self, ticket: &Ticket) -> bool {
        self.lock().latest.get(&ticket.key) == Some(&ticket.seq)
    }

    /// Retires `ticket`. Returns whether it was still the entity's latest
    /// mutation; only then may its response touch state.
    pub fn settle(&self, ticket: Ticket) -> bool {
        let mut inner = self.lock();
        if inner.latest.get(&ticket.key) == Some(&ticket.seq) {
            inner.latest.remove(&ticket.key);
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> usize {
        self.lock().latest.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
