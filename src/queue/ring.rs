// Bounded multi-producer single-consumer ring. Submissions never wait for the
// consumer; a producer that laps the reader displaces the unread record in
// its slot.

use super::RecordQueue;
use crate::record::Record;
use std::cell::UnsafeCell;
use std::mem::size_of;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cache-aligned wrapper to prevent false sharing
#[repr(align(64))]
struct CacheAligned<T>(T);

/// One slot: a spin flag guarding the record. `Some` marks the slot as
/// holding an unread record; pushing over it drops the old one silently.
#[repr(align(64))]
struct Slot {
    flag: AtomicBool,
    record: UnsafeCell<Option<Record>>,
}

impl Slot {
    fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            record: UnsafeCell::new(None),
        }
    }
}

/// Holds a slot's spin flag for the duration of a record move. The critical
/// section is a move plus a marker update and never crosses I/O.
struct SpinGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SpinGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Self {
        while flag.swap(true, Ordering::Acquire) {
            std::hint::spin_loop();
        }
        Self { flag }
    }
}

impl Drop for SpinGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Fixed-capacity ring of record slots. Records come out in slot order, which
/// can differ from push order once the write index wraps.
pub struct RingQueue {
    slots: Box<[Slot]>,
    /// Consumer-only cursor; deliberately a plain integer, not an atomic.
    read_index: CacheAligned<UnsafeCell<usize>>,
    write_index: CacheAligned<AtomicUsize>,
}

// SAFETY: a slot's record is only touched while its spin flag is held, and
// the flag's Acquire/Release pair publishes the record bytes to the consumer.
// `read_index` is only accessed by the single consumer thread, which the
// `RecordQueue` contract requires.
unsafe impl Sync for RingQueue {}

impl RingQueue {
    /// Create a ring with a fixed number of slots.
    ///
    /// # Panics
    /// Panics if `slot_count` is zero.
    pub fn new(slot_count: usize) -> Self {
        assert!(slot_count > 0, "ring needs at least one slot");
        let slots: Vec<Slot> = (0..slot_count).map(|_| Slot::new()).collect();
        Self {
            slots: slots.into_boxed_slice(),
            read_index: CacheAligned(UnsafeCell::new(0)),
            write_index: CacheAligned(AtomicUsize::new(0)),
        }
    }

    /// Size the ring from a byte budget: one slot per record footprint,
    /// minimum one.
    pub fn with_byte_budget(budget_bytes: usize) -> Self {
        Self::new((budget_bytes / size_of::<Record>()).max(1))
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl RecordQueue for RingQueue {
    fn push(&self, record: Record) {
        let index = self.write_index.0.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        let slot = &self.slots[index];
        let _lock = SpinGuard::acquire(&slot.flag);
        // SAFETY: the slot's flag is held.
        unsafe {
            *slot.record.get() = Some(record);
        }
    }

    fn try_pop(&self) -> Option<Record> {
        // SAFETY: only the consumer thread advances the read cursor.
        let read_index = unsafe { &mut *self.read_index.0.get() };
        let slot = &self.slots[*read_index % self.slots.len()];
        let _lock = SpinGuard::acquire(&slot.flag);
        // SAFETY: the slot's flag is held.
        let record = unsafe { (*slot.record.get()).take() };
        if record.is_some() {
            *read_index += 1;
        }
        record
    }
}
