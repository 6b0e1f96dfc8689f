//! End-to-end tests: records submitted through a service (or the
//! process-wide surface) must come back out of the files intact.

use flashlog::{Config, FileSink, Level, LoggerService, Record, RingQueue};
use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

/// Serializes the tests that install the process-wide logger.
static GLOBAL_LOGGER: Mutex<()> = Mutex::new(());

fn log_dir() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let directory = format!("{}/", dir.path().display());
    (dir, directory)
}

fn read_lines(dir: &TempDir, file_name: &str, index: u32) -> Vec<String> {
    let path = dir.path().join(format!("{}{}.txt", file_name, index));
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn guaranteed_single_record_layout() {
    let _guard = GLOBAL_LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, directory) = log_dir();
    flashlog::initialize_guaranteed(&directory, "t", 1);

    let mut record = Record::new(Level::Info, "x.rs", "f", 10);
    record
        .append("Logging ")
        .append("benchmark")
        .append(7i32)
        .append(0i32)
        .append('K')
        .append(-42.42f64);
    flashlog::submit(record);
    flashlog::shutdown();

    let raw = fs::read_to_string(dir.path().join("t1.txt")).unwrap();
    assert!(raw.ends_with('\n'));
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 1);

    let line = lines[0];
    assert!(
        line.ends_with("] Logging benchmark70K-42.42"),
        "unexpected line: {line}"
    );
    let fields: Vec<&str> = line.split(']').collect();
    assert!(fields[0].starts_with('['));
    assert!(fields[0][1..].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(fields[1], "[INFO");
    assert!(fields[2].starts_with('['));
    assert!(fields[2][1..].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(fields[3], "[x.rs:f:10");
}

#[test]
fn single_slot_ring_under_contention() {
    let (dir, directory) = log_dir();
    let service = Arc::new(LoggerService::new(
        Arc::new(RingQueue::new(1)),
        FileSink::new(&directory, "ring", 8),
    ));

    let mut handles = Vec::new();
    for producer in 0..2u32 {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            for n in 0..1000u32 {
                let mut record = Record::new(Level::Info, "x.rs", "producer", 1);
                record.append(producer).append('#').append(n);
                service.submit(record);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    drop(service);

    let lines = read_lines(&dir, "ring", 1);
    assert!(
        !lines.is_empty() && lines.len() <= 2000,
        "line count out of range: {}",
        lines.len()
    );
    for line in &lines {
        assert!(line.contains("][INFO]["), "malformed line: {line}");
        assert!(line.contains("[x.rs:producer:1] "), "malformed line: {line}");
        let tail = line.rsplit("] ").next().unwrap();
        let parts: Vec<&str> = tail.split('#').collect();
        assert_eq!(parts.len(), 2, "malformed argument tail: {tail}");
        let producer: u32 = parts[0].parse().unwrap();
        let n: u32 = parts[1].parse().unwrap();
        assert!(producer < 2 && n < 1000);
    }
}

#[test]
fn oversized_record_spills_and_formats() {
    let (dir, directory) = log_dir();
    let service = LoggerService::guaranteed(&directory, "big", 8);

    let payload = "y".repeat(10_000);
    let mut record = Record::new(Level::Warn, "x.rs", "big", 2);
    record.append(payload.clone());
    service.submit(record);
    drop(service);

    let lines = read_lines(&dir, "big", 1);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[WARN]"));
    assert!(lines[0].ends_with(&payload));
}

#[test]
fn roll_splits_between_records() {
    let (dir, directory) = log_dir();
    let service = LoggerService::guaranteed(&directory, "roll", 1);

    let payload = "z".repeat(600 * 1024);
    for n in 0..3u32 {
        let mut record = Record::new(Level::Info, "x.rs", "fill", n);
        record.append(payload.clone());
        service.submit(record);
    }
    drop(service);

    // 1.8 MiB against a 1 MiB roll: the second record crosses the threshold,
    // so the third starts file two. Indices stay contiguous from 1.
    let first = read_lines(&dir, "roll", 1);
    let second = read_lines(&dir, "roll", 2);
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert!(!dir.path().join("roll3.txt").exists());
    for line in first.iter().chain(second.iter()) {
        assert!(line.ends_with(&payload));
    }
}

#[test]
fn shutdown_drains_every_submission() {
    let _guard = GLOBAL_LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, directory) = log_dir();
    flashlog::initialize_guaranteed(&directory, "drain", 4);

    for n in 0..500u32 {
        let mut record = Record::new(Level::Info, "x.rs", "drain", 3);
        record.append(n);
        flashlog::submit(record);
    }
    flashlog::shutdown();

    let lines = read_lines(&dir, "drain", 1);
    assert_eq!(lines.len(), 500);
    for (n, line) in lines.iter().enumerate() {
        assert!(line.ends_with(&format!("] {}", n)));
    }
}

#[test]
fn reinitialize_replaces_service_after_draining() {
    let _guard = GLOBAL_LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, directory) = log_dir();

    flashlog::initialize_guaranteed(&directory, "first", 4);
    let mut record = Record::new(Level::Info, "x.rs", "gen", 1);
    record.append("one");
    flashlog::submit(record);

    flashlog::initialize_guaranteed(&directory, "second", 4);
    let mut record = Record::new(Level::Info, "x.rs", "gen", 2);
    record.append("two");
    flashlog::submit(record);
    flashlog::shutdown();

    let first = read_lines(&dir, "first", 1);
    assert_eq!(first.len(), 1);
    assert!(first[0].ends_with("] one"));

    let second = read_lines(&dir, "second", 1);
    assert_eq!(second.len(), 1);
    assert!(second[0].ends_with("] two"));
}

#[test]
fn macro_call_sites_reach_the_file() {
    let _guard = GLOBAL_LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, directory) = log_dir();
    flashlog::initialize_guaranteed(&directory, "m", 4);

    flashlog::log_info!("sweep ", 3u32, " of ", 4u32);
    flashlog::log_crit!("fault code ", 57005u64);
    flashlog::shutdown();

    let lines = read_lines(&dir, "m", 1);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("[INFO]"));
    assert!(lines[0].contains("logger_tests"));
    assert!(lines[0].ends_with("] sweep 3 of 4"));
    assert!(lines[1].contains("[CRIT]"));
    assert!(lines[1].ends_with("] fault code 57005"));
}

#[test]
fn config_file_initialization() {
    let _guard = GLOBAL_LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, directory) = log_dir();

    let source = format!(
        r#"{{
            directory: "{directory}",
            file_name: "cfg",
            roll_size_mb: 2,
            queue: {{ mode: "non_guaranteed", ring_budget_mb: 1 }},
        }}"#
    );
    let config = Config::parse(&source).unwrap();
    flashlog::initialize_from_config(&config).unwrap();

    let mut record = Record::new(Level::Info, "x.rs", "cfg", 4);
    record.append("configured");
    flashlog::submit(record);
    flashlog::shutdown();

    let lines = read_lines(&dir, "cfg", 1);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("] configured"));
}

#[test]
fn spillable_preserves_per_producer_order_under_contention() {
    let (dir, directory) = log_dir();
    let service = Arc::new(LoggerService::guaranteed(&directory, "order", 8));

    let mut handles = Vec::new();
    for producer in 0..4u32 {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            for n in 0..250u32 {
                let mut record = Record::new(Level::Info, "x.rs", "order", 1);
                record.append(producer).append('#').append(n);
                service.submit(record);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    drop(service);

    let lines = read_lines(&dir, "order", 1);
    assert_eq!(lines.len(), 1000);

    // Every record arrives exactly once, and each producer's records appear
    // in its submission order.
    let mut next_per_producer = [0u32; 4];
    for line in &lines {
        let tail = line.rsplit("] ").next().unwrap();
        let parts: Vec<&str> = tail.split('#').collect();
        let producer: usize = parts[0].parse().unwrap();
        let n: u32 = parts[1].parse().unwrap();
        assert_eq!(n, next_per_producer[producer], "out of order: {tail}");
        next_per_producer[producer] += 1;
    }
    assert_eq!(next_per_producer, [250; 4]);
}
