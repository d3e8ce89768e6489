//! Deadline store for the controller's timers.

use threshold_types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry<K> {
    key: K,
    deadline: Timestamp,
    seq: u64,
}

/// Pending `(key, deadline)` pairs. At most one deadline per key.
///
/// [`pop_due`](Self::pop_due) yields timers in deadline order; timers that
/// share a deadline fire in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    entries: Vec<Entry<K>>,
    next_seq: u64,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K: Copy + Eq> Scheduler<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` at `deadline`, replacing any pending deadline for it.
    pub fn schedule(&mut self, key: K, deadline: Timestamp) {
        self.cancel(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { key, deadline, seq });
    }

    /// Returns whether a pending timer was removed.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return the earliest timer due at `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(K, Timestamp)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(i, _)| i)?;
        let entry = self.entries.swap_remove(index);
        Some((entry.key, entry.deadline))
    }

    #[must_use]
    pub fn deadline(&self, key: K) -> Option<Timestamp> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.deadline)
    }

    #[must_use]
    pub fn is_scheduled(&self, key: K) -> bool {
        self.deadline(key).is_some()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
