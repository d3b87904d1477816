//! Fixed-capacity FIFO history.

use std::collections::vec_deque;
use std::collections::VecDeque;

/// Default number of position samples kept per tracked entity.
pub const DEFAULT_POSITION_CAPACITY: usize = 5;

/// Default number of distances kept for trend classification.
pub const DEFAULT_DISTANCE_CAPACITY: usize = 10;

/// Bounded history in arrival order. Pushing onto a full buffer evicts the
/// oldest entry.
///
/// Entries are never re-sorted, so out-of-order timestamps stay where they
/// arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> HistoryBuffer<T> {
    /// Create an empty buffer. A capacity of 0 is coerced to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an entry, returning the evicted oldest entry if the buffer was full.
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Second most recent entry.
    pub fn previous(&self) -> Option<&T> {
        self.entries.len().checked_sub(2).and_then(|i| self.entries.get(i))
    }

    /// Entries oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Copy of the entries, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T: PartialEq> HistoryBuffer<T> {
    pub fn contains(&self, entry: &T) -> bool {
        self.entries.contains(entry)
    }
}

impl<'a, T> IntoIterator for &'a HistoryBuffer<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
