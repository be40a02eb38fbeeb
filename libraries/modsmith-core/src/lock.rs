//! Process-wide operation lock
//!
//! Serializes every high-level operation (patching, mod install/uninstall,
//! importing). At most one operation holds the lock; the holder's identity is
//! observable so the UI can explain why an action is unavailable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

/// Mutually-exclusive application operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Patching the application with a mod loader
    Patching,
    /// Repatching with a different loader
    Repatching,
    /// Installing mods
    InstallingMods,
    /// Uninstalling mods
    UninstallingMods,
    /// Draining the import queue
    Importing,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Patching => "patching",
            Operation::Repatching => "repatching",
            Operation::InstallingMods => "installing mods",
            Operation::UninstallingMods => "uninstalling mods",
            Operation::Importing => "importing",
        };
        f.write_str(name)
    }
}

/// Returned when the lock is already held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("another operation ({holder}) is in progress")]
pub struct LockBusy {
    /// The operation currently holding the lock
    pub holder: Operation,
}

/// The process-wide lock
#[derive(Debug)]
pub struct OperationLock {
    holder: watch::Sender<Option<Operation>>,
}

impl OperationLock {
    /// Create a free lock
    pub fn new() -> Self {
        let (holder, _) = watch::channel(None);
        Self { holder }
    }

    /// Acquire the lock for `operation` without waiting
    ///
    /// The lock is released when the returned guard is dropped.
    ///
    /// # Errors
    /// Returns `LockBusy` naming the current holder if the lock is taken
    pub fn try_acquire(self: &Arc<Self>, operation: Operation) -> Result<OperationGuard, LockBusy> {
        let mut busy = None;
        self.holder.send_if_modified(|current| match current {
            Some(holder) => {
                busy = Some(*holder);
                false
            }
            None => {
                *current = Some(operation);
                true
            }
        });

        if let Some(holder) = busy {
            return Err(LockBusy { holder });
        }

        debug!("Operation lock acquired for {}", operation);
        Ok(OperationGuard {
            lock: Arc::clone(self),
            operation,
        })
    }

    /// The operation currently holding the lock
    pub fn holder(&self) -> Option<Operation> {
        *self.holder.borrow()
    }

    /// Whether no operation holds the lock
    pub fn is_free(&self) -> bool {
        self.holder().is_none()
    }

    /// Watch holder changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Operation>> {
        self.holder.subscribe()
    }

    fn release(&self, operation: Operation) {
        self.holder.send_modify(|current| *current = None);
        debug!("Operation lock released by {}", operation);
    }
}

impl Default for OperationLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of holding the operation lock
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct OperationGuard {
    lock: Arc<OperationLock>,
    operation: Operation,
}

impl OperationGuard {
    /// The operation this guard was acquired for
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.lock.release(self.operation);
    }
}
