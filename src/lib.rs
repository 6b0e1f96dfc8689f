// SPDX-License-Identifier: Apache-2.0 OR MIT
// Low-latency asynchronous logging.
//
// Producers encode arguments into a pre-owned record buffer and hand the
// record to a single consumer thread, which formats it and appends it to a
// rolling sequence of text files. Formatting and file I/O never happen on
// the calling thread.

pub mod config;
mod format;
mod level;
#[macro_use]
mod macros;
mod queue;
mod record;
mod service;
mod sink;

// Public exports
pub use config::{Config, ConfigError, QueueConfig};
pub use level::{is_logged, set_level, Level};
pub use queue::{RecordQueue, RingQueue, SpillQueue};
pub use record::{Loggable, Record};
pub use service::{
    initialize_from_config, initialize_guaranteed, initialize_non_guaranteed, shutdown, submit,
    LoggerService,
};
pub use sink::FileSink;
