// Producer/consumer handoff disciplines

mod ring;
mod spill;

pub use ring::RingQueue;
pub use spill::SpillQueue;

use crate::record::Record;

/// Submit-and-drain contract shared by both queue disciplines.
///
/// Any number of producer threads may push concurrently; exactly one consumer
/// thread may pop. `push` moves the record in and never blocks on I/O.
pub trait RecordQueue: Send + Sync {
    /// Hand a record over to the consumer.
    fn push(&self, record: Record);

    /// Take the next record, if any.
    ///
    /// Must only be called from the single consumer thread.
    fn try_pop(&self) -> Option<Record>;
}
