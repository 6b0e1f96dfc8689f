// Unbounded staging queue. Submissions are never dropped; producers pay a
// short mutex hold instead of a slot spin.

use super::RecordQueue;
use crate::record::Record;
use std::cell::UnsafeCell;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Producers append to `staged` under a mutex held only for the push itself.
/// The consumer drains a private batch and, when it runs dry, swaps the whole
/// staged vector out in one motion, so producers are never blocked behind
/// formatting or file I/O.
pub struct SpillQueue {
    staged: Mutex<Vec<Record>>,
    draining: UnsafeCell<VecDeque<Record>>,
}

// SAFETY: `staged` is mutex-guarded; `draining` is only touched from
// `try_pop`, which the `RecordQueue` contract restricts to the single
// consumer thread.
unsafe impl Sync for SpillQueue {}

impl SpillQueue {
    pub fn new() -> Self {
        Self {
            staged: Mutex::new(Vec::new()),
            draining: UnsafeCell::new(VecDeque::new()),
        }
    }
}

impl Default for SpillQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordQueue for SpillQueue {
    fn push(&self, record: Record) {
        self.staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    fn try_pop(&self) -> Option<Record> {
        // SAFETY: only the consumer thread touches the drain batch.
        let draining = unsafe { &mut *self.draining.get() };
        if draining.is_empty() {
            let mut staged = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
            if staged.is_empty() {
                return None;
            }
            *draining = VecDeque::from(std::mem::take(&mut *staged));
        }
        draining.pop_front()
    }
}
