//! Append-only collection shared between worker threads.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Append-only list behind one exclusive lock.
///
/// The lock is held only while the list itself changes or is copied, never
/// while caller code runs.
#[derive(Debug, Default)]
pub struct ConcurrentBag<T> {
    items: Mutex<Vec<T>>,
}

impl<T> ConcurrentBag<T> {
    /// An empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Append one item.
    pub fn push(&self, item: T) {
        self.lock().push(item);
    }

    /// Append many items under a single lock acquisition.
    ///
    /// The iterator is collected before locking.
    pub fn extend<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        if !items.is_empty() {
            self.lock().extend(items);
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no item was added.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take the items out, in insertion order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // A panic while holding the lock cannot leave the Vec half-updated.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> ConcurrentBag<T> {
    /// Copy of the current items, in insertion order.
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }
}
