//! Per-parent mutual exclusion for resolve-and-create.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per parent folder (`None` = tree root).
///
/// Holding the guard while resolving a name and inserting the folder
/// serializes uploads in this process that create siblings under the same
/// parent. Other processes are kept apart by the sibling-name unique index.
#[derive(Debug, Default)]
pub struct ParentLocks {
    locks: DashMap<Option<Uuid>, Arc<Mutex<()>>>,
}

impl ParentLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `parent_id`'s children.
    pub async fn lock(&self, parent_id: Option<Uuid>) -> OwnedMutexGuard<()> {
        let mutex = self.locks.entry(parent_id).or_default().clone();
        mutex.lock_owned().await
    }

    /// Drop entries nobody is holding or waiting on.
    pub fn release_idle(&self) {
        self.locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }

    /// Number of parents currently tracked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no parent is tracked.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
