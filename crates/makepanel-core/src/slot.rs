//! The command slot

use makepanel_host_api::CommandHandle;
use makepanel_util::RunId;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Guarded single-entry registry of the running command
///
/// Every operation is one swap or one read under the guard. The guard is a
/// plain mutex and is never held across an `.await`.
#[derive(Debug, Default)]
pub struct CommandSlot {
    current: Mutex<Option<CommandHandle>>,
}

impl CommandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Option<CommandHandle>> {
        // A poisoned guard still holds a complete Option
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `handle` if the slot is empty.
    ///
    /// Returns false, leaving the slot untouched, if a command is already
    /// registered.
    pub fn try_acquire(&self, handle: CommandHandle) -> bool {
        let mut current = self.guard();
        if current.is_some() {
            return false;
        }

        debug!(run_id = %handle.run_id, name = %handle.name, "Slot acquired");
        *current = Some(handle);
        true
    }

    /// Clear the slot for `run_id`.
    ///
    /// Only the waiter of a run calls this, once, after observing exit. A
    /// release for any other run id is a no-op, so the slot goes from
    /// occupied to empty exactly once per run. Returns whether it cleared.
    pub fn release(&self, run_id: &RunId) -> bool {
        let mut current = self.guard();
        match current.as_ref() {
            Some(handle) if &handle.run_id == run_id => {
                debug!(run_id = %run_id, name = %handle.name, "Slot released");
                *current = None;
                true
            }
            _ => false,
        }
    }

    /// Snapshot of the current handle
    pub fn peek(&self) -> Option<CommandHandle> {
        self.guard().clone()
    }

    /// Handle to signal, if any. The slot keeps it: running means the
    /// process has not exited, whether or not a signal was sent.
    pub fn take_for_signal(&self) -> Option<CommandHandle> {
        self.guard().clone()
    }

    pub fn is_running(&self) -> bool {
        self.guard().is_some()
    }
}
