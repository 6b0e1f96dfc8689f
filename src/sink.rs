// Rolling file sink. Only the consumer thread writes here, so no
// synchronization is needed; I/O errors are swallowed and the consumer keeps
// going.

use crate::format;
use crate::record::Record;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

/// Appends formatted records to `{directory}{file_name}{n}.txt`, rolling to
/// the next `n` once the current file crosses the size threshold.
pub struct FileSink {
    stem: String,
    roll_size_bytes: u64,
    file_index: u32,
    bytes_written: u64,
    scratch: Vec<u8>,
    out: Option<BufWriter<File>>,
}

impl FileSink {
    /// Open `{directory}{file_name}1.txt` for append. Directory and name are
    /// concatenated verbatim, so the directory should be empty or end with a
    /// path separator. The file index restarts at 1 on every construction;
    /// existing files are appended to, never probed.
    pub fn new(directory: &str, file_name: &str, roll_size_mb: u32) -> Self {
        let mut sink = Self {
            stem: format!("{}{}", directory, file_name),
            roll_size_bytes: roll_size_mb as u64 * 1024 * 1024,
            file_index: 0,
            bytes_written: 0,
            scratch: Vec::with_capacity(512),
            out: None,
        };
        sink.roll();
        sink
    }

    /// Format one record and append the whole line. The roll threshold is
    /// checked after the write, so a file can exceed it by one record.
    pub fn write(&mut self, record: &Record) {
        self.scratch.clear();
        format::write_line(record.as_bytes(), &mut self.scratch);

        let Some(out) = self.out.as_mut() else {
            return;
        };
        if out.write_all(&self.scratch).is_err() {
            return;
        }
        self.bytes_written += self.scratch.len() as u64;
        if self.bytes_written > self.roll_size_bytes {
            self.roll();
        }
    }

    pub fn flush(&mut self) {
        if let Some(out) = self.out.as_mut() {
            let _ = out.flush();
        }
    }

    /// Flush and close the current file, then open the next index. A failed
    /// open leaves the sink silently discarding lines.
    fn roll(&mut self) {
        if let Some(mut out) = self.out.take() {
            let _ = out.flush();
        }
        self.bytes_written = 0;
        self.file_index += 1;
        let path = format!("{}{}.txt", self.stem, self.file_index);
        self.out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
            .map(BufWriter::new);
    }
}
