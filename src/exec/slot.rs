// src/exec/slot.rs

use std::sync::{Arc, Mutex};

/// Synchronized record of the start command's running child.
///
/// Holds the pid between a successful spawn and the moment the child is
/// observed to have exited (or was forcibly terminated). There is never more
/// than one entry.
#[derive(Debug, Clone, Default)]
pub struct ChildSlot {
    pid: Arc<Mutex<Option<u32>>>,
}

impl ChildSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pid: u32) {
        *self.lock() = Some(pid);
    }

    /// Clear the slot, returning the pid that was recorded, if any.
    pub fn clear(&self) -> Option<u32> {
        self.lock().take()
    }

    pub fn pid(&self) -> Option<u32> {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<u32>> {
        // The guarded value is a plain pid, so a poisoned lock is still usable.
        self.pid.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
