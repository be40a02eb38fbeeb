//! The import queue and the session state that owns it
//!
//! At most one queue exists at a time. It is created by the submission that
//! starts a drain, grows when later submissions merge into it, and disappears
//! the moment the drain observes it empty. The operation lock guard lives
//! next to the queue so both are released together.

use crate::ImportItem;
use modsmith_core::OperationGuard;
use std::collections::VecDeque;

/// FIFO of pending imports
#[derive(Debug, Default)]
pub struct ImportQueue {
    items: VecDeque<ImportItem>,
}

impl ImportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append items in the order given
    pub fn extend(&mut self, items: impl IntoIterator<Item = ImportItem>) {
        self.items.extend(items);
    }

    /// Remove the head item
    pub fn pop_front(&mut self) -> Option<ImportItem> {
        self.items.pop_front()
    }
}

/// A drain in progress: the live queue plus the lock held for it
#[derive(Debug)]
struct ActiveDrain {
    id: u64,
    queue: ImportQueue,
    _guard: OperationGuard,
}

/// Result of offering a batch to the session
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Offer {
    /// Appended to the running drain; the caller must not drain
    Merged { queued: usize },
    /// A new queue was opened; the caller owns the drain loop for drain `id`
    Opened { queued: usize, id: u64 },
}

/// Present/absent queue for one importer session
#[derive(Debug, Default)]
pub(crate) struct DrainSlot {
    active: Option<ActiveDrain>,
    opened: u64,
}

impl DrainSlot {
    pub fn is_draining(&self) -> bool {
        self.active.is_some()
    }

    /// Merge `items` into the live queue if a drain is running
    ///
    /// Returns the items back when no drain is running.
    pub fn merge(&mut self, items: Vec<ImportItem>) -> Result<Offer, Vec<ImportItem>> {
        match self.active.as_mut() {
            Some(active) => {
                let queued = items.len();
                active.queue.extend(items);
                Ok(Offer::Merged { queued })
            }
            None => Err(items),
        }
    }

    /// Open a new queue holding `items`, owned by `guard`
    pub fn open(&mut self, items: Vec<ImportItem>, guard: OperationGuard) -> Offer {
        debug_assert!(self.active.is_none(), "a second import queue was opened");
        let mut queue = ImportQueue::new();
        let queued = items.len();
        queue.extend(items);
        self.opened += 1;
        let id = self.opened;
        self.active = Some(ActiveDrain {
            id,
            queue,
            _guard: guard,
        });
        Offer::Opened { queued, id }
    }

    /// Abandon drain `id` if it is still the live one
    ///
    /// Pending items are dropped and the operation lock is released; returns
    /// how many were dropped. A drain opened after `id` finished is left alone.
    pub fn close(&mut self, id: u64) -> Option<usize> {
        match self.active.take() {
            Some(active) if active.id == id => Some(active.queue.items.len()),
            other => {
                self.active = other;
                None
            }
        }
    }

    /// Take the next item, or close the drain if the queue is empty
    ///
    /// Closing drops the queue and releases the operation lock.
    pub fn next_item(&mut self) -> Option<ImportItem> {
        let active = self.active.as_mut()?;
        match active.queue.pop_front() {
            Some(item) => Some(item),
            None => {
                self.active = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modsmith_core::{Operation, OperationLock};
    use std::path::Path;
    use std::sync::Arc;

    fn items(names: &[&str]) -> Vec<ImportItem> {
        names.iter().map(|n| ImportItem::new(*n, None)).collect()
    }

    #[test]
    fn test_merge_without_drain_returns_items() {
        let mut slot = DrainSlot::default();
        let back = slot.merge(items(&["a.qmod"])).unwrap_err();
        assert_eq!(back.len(), 1);
        assert!(!slot.is_draining());
    }

    #[test]
    fn test_merged_items_come_after_queued_ones() {
        let lock = Arc::new(OperationLock::new());
        let mut slot = DrainSlot::default();

        let guard = lock.try_acquire(Operation::Importing).unwrap();
        assert_eq!(
            slot.open(items(&["a", "b"]), guard),
            Offer::Opened { queued: 2, id: 1 }
        );
        assert_eq!(slot.next_item().unwrap().path(), Path::new("a"));

        assert_eq!(slot.merge(items(&["c", "a"])), Ok(Offer::Merged { queued: 2 }));

        let order: Vec<_> = std::iter::from_fn(|| slot.next_item())
            .map(|item| item.path().to_path_buf())
            .collect();
        assert_eq!(order, vec![Path::new("b"), Path::new("c"), Path::new("a")]);
    }

    #[test]
    fn test_empty_queue_closes_drain_and_releases_lock() {
        let lock = Arc::new(OperationLock::new());
        let mut slot = DrainSlot::default();

        let guard = lock.try_acquire(Operation::Importing).unwrap();
        slot.open(items(&["a"]), guard);
        assert!(!lock.is_free());

        assert!(slot.next_item().is_some());
        assert!(slot.is_draining());
        assert!(slot.next_item().is_none());
        assert!(!slot.is_draining());
        assert!(lock.is_free());
    }

    #[test]
    fn test_close_abandons_live_drain_and_releases_lock() {
        let lock = Arc::new(OperationLock::new());
        let mut slot = DrainSlot::default();

        let guard = lock.try_acquire(Operation::Importing).unwrap();
        let Offer::Opened { id, .. } = slot.open(items(&["a", "b"]), guard) else {
            panic!("expected a new drain");
        };
        assert!(slot.next_item().is_some());

        assert_eq!(slot.close(id), Some(1));
        assert!(!slot.is_draining());
        assert!(lock.is_free());
        assert_eq!(slot.close(id), None);
    }

    #[test]
    fn test_close_leaves_newer_drain_alone() {
        let lock = Arc::new(OperationLock::new());
        let mut slot = DrainSlot::default();

        let guard = lock.try_acquire(Operation::Importing).unwrap();
        let Offer::Opened { id: first, .. } = slot.open(items(&["a"]), guard) else {
            panic!("expected a new drain");
        };
        assert!(slot.next_item().is_some());
        assert!(slot.next_item().is_none());

        let guard = lock.try_acquire(Operation::Importing).unwrap();
        let Offer::Opened { id: second, .. } = slot.open(items(&["b"]), guard) else {
            panic!("expected a new drain");
        };
        assert_ne!(first, second);

        assert_eq!(slot.close(first), None);
        assert!(slot.is_draining());
        assert!(!lock.is_free());
    }
}
