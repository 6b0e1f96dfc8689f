// Logger service: owns the queue and the single consumer thread, and hosts
// the process-wide install/submit/shutdown surface.

use crate::config::{Config, ConfigError, QueueConfig};
use crate::level::set_level;
use crate::queue::{RecordQueue, RingQueue, SpillQueue};
use crate::record::Record;
use crate::sink::FileSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long the consumer naps when the queue is empty. The only place a
/// thread in this library blocks on a clock.
const IDLE_SLEEP: Duration = Duration::from_micros(50);

/// One queue, one sink, one consumer thread. Dropping the service raises the
/// disable flag and joins the consumer, which writes out everything already
/// queued before the drop returns.
pub struct LoggerService {
    queue: Arc<dyn RecordQueue>,
    disabled: Arc<AtomicBool>,
    consumer: Option<JoinHandle<()>>,
}

impl LoggerService {
    /// Service over an unbounded queue: every submitted record reaches a
    /// file, in submission order per producer.
    pub fn guaranteed(directory: &str, file_name: &str, roll_size_mb: u32) -> Self {
        Self::new(
            Arc::new(SpillQueue::new()),
            FileSink::new(directory, file_name, roll_size_mb),
        )
    }

    /// Service over a bounded ring: submissions never wait, but a producer
    /// that laps the consumer displaces unread records. The budget buys one
    /// slot per 256 record bytes.
    pub fn non_guaranteed(
        ring_budget_mb: u32,
        directory: &str,
        file_name: &str,
        roll_size_mb: u32,
    ) -> Self {
        let budget_bytes = ring_budget_mb as usize * 1024 * 1024;
        Self::new(
            Arc::new(RingQueue::with_byte_budget(budget_bytes)),
            FileSink::new(directory, file_name, roll_size_mb),
        )
    }

    /// Spawn the consumer thread over an explicit queue and sink. The sink
    /// moves into the thread; nothing else ever touches it.
    pub fn new(queue: Arc<dyn RecordQueue>, sink: FileSink) -> Self {
        let disabled = Arc::new(AtomicBool::new(false));
        let consumer_queue = Arc::clone(&queue);
        let consumer_disabled = Arc::clone(&disabled);
        let consumer = thread::spawn(move || consume(consumer_queue, sink, consumer_disabled));
        Self {
            queue,
            disabled,
            consumer: Some(consumer),
        }
    }

    /// Move a record into the queue. Never blocks on I/O.
    #[inline]
    pub fn submit(&self, record: Record) {
        self.queue.push(record);
    }
}

impl Drop for LoggerService {
    fn drop(&mut self) {
        self.disabled.store(true, Ordering::SeqCst);
        if let Some(consumer) = self.consumer.take() {
            let _ = consumer.join();
        }
    }
}

fn consume(queue: Arc<dyn RecordQueue>, mut sink: FileSink, disabled: Arc<AtomicBool>) {
    while !disabled.load(Ordering::SeqCst) {
        match queue.try_pop() {
            Some(record) => sink.write(&record),
            None => thread::sleep(IDLE_SLEEP),
        }
    }
    // Everything submitted before the disable flag was raised is still in the
    // queue; write it all out before exiting.
    while let Some(record) = queue.try_pop() {
        sink.write(&record);
    }
    sink.flush();
}

/// The process-wide service handle.
static SERVICE: RwLock<Option<LoggerService>> = RwLock::new(None);

/// Install a guaranteed-delivery service as the process-wide logger.
pub fn initialize_guaranteed(directory: &str, file_name: &str, roll_size_mb: u32) {
    install(|| LoggerService::guaranteed(directory, file_name, roll_size_mb));
}

/// Install a drop-on-overrun service as the process-wide logger, with a ring
/// sized from `ring_budget_mb`.
pub fn initialize_non_guaranteed(
    ring_budget_mb: u32,
    directory: &str,
    file_name: &str,
    roll_size_mb: u32,
) {
    install(|| LoggerService::non_guaranteed(ring_budget_mb, directory, file_name, roll_size_mb));
}

/// Validate `config`, apply its level to the gate, and install the matching
/// service.
pub fn initialize_from_config(config: &Config) -> Result<(), ConfigError> {
    config.validate()?;
    set_level(config.level);
    match config.queue {
        QueueConfig::Guaranteed => {
            initialize_guaranteed(&config.directory, &config.file_name, config.roll_size_mb)
        }
        QueueConfig::NonGuaranteed { ring_budget_mb } => initialize_non_guaranteed(
            ring_budget_mb,
            &config.directory,
            &config.file_name,
            config.roll_size_mb,
        ),
    }
    Ok(())
}

/// Hand a record to the installed service.
///
/// Records submitted while no service is installed are discarded.
pub fn submit(record: Record) {
    let guard = SERVICE.read().unwrap_or_else(PoisonError::into_inner);
    if let Some(service) = guard.as_ref() {
        service.submit(record);
    }
}

/// Tear the installed service down, draining everything submitted so far.
/// Afterwards submissions are discarded until the next initialize.
pub fn shutdown() {
    let previous = SERVICE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    drop(previous);
}

fn install(build: impl FnOnce() -> LoggerService) {
    let mut guard = SERVICE.write().unwrap_or_else(PoisonError::into_inner);
    // Join the outgoing consumer first: its queue drains and its files close
    // before the replacement starts a new index sequence at 1.
    *guard = None;
    *guard = Some(build());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn record(n: u32) -> Record {
        let mut record = Record::new(Level::Info, "service.rs", "t", 1);
        record.append(n);
        record
    }

    #[test]
    fn test_guaranteed_service_drains_on_drop() {
        let dir = TempDir::new().unwrap();
        let directory = format!("{}/", dir.path().display());

        let service = LoggerService::guaranteed(&directory, "svc", 4);
        for n in 0..100 {
            service.submit(record(n));
        }
        drop(service);

        let content = std::fs::read_to_string(dir.path().join("svc1.txt")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 100);
        for (n, line) in lines.iter().enumerate() {
            assert!(line.ends_with(&format!("] {}", n)));
        }
    }

    #[test]
    fn test_ring_service_accepts_bursts() {
        let dir = TempDir::new().unwrap();
        let directory = format!("{}/", dir.path().display());

        let service = LoggerService::new(
            Arc::new(RingQueue::new(8)),
            FileSink::new(&directory, "burst", 4),
        );
        for n in 0..1000 {
            service.submit(record(n));
        }
        drop(service);

        let content = std::fs::read_to_string(dir.path().join("burst1.txt")).unwrap();
        let count = content.lines().count();
        assert!(count >= 1 && count <= 1000);
    }

    #[test]
    fn test_submit_without_service_is_discarded() {
        // No install in this process' unit tests, so this exercises the
        // uninitialized path.
        submit(record(0));
    }
}
