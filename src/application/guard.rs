//! In-flight and teardown flags shared by the controllers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// At most one operation in flight; extra attempts are refused, not queued.
#[derive(Debug, Default)]
pub(crate) struct BusyFlag(AtomicBool);

impl BusyFlag {
    /// Claims the flag, or `None` if an operation is already running.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.0))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the flag when dropped, including when the owning future is dropped.
#[derive(Debug)]
pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Cleared on teardown; results arriving afterwards are dropped.
#[derive(Debug)]
pub(crate) struct Attachment(AtomicBool);

impl Default for Attachment {
    fn default() -> Self {
        Self(AtomicBool::new(true))
    }
}

impl Attachment {
    pub fn detach(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_attached(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Locks controller state, recovering it from a poisoned lock.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
