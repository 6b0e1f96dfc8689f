// Log levels and the global level gate

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels (higher is more severe)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// Routine operational messages
    Info = 0,
    /// Unexpected but recoverable conditions
    Warn = 1,
    /// Serious failures
    Crit = 2,
}

impl Level {
    /// Get the level as u8 (0-2)
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get the level name as a static string
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Crit => "CRIT",
        }
    }

    /// Create from u8 value (returns None if invalid)
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Level::Info),
            1 => Some(Level::Warn),
            2 => Some(Level::Crit),
            _ => None,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Info
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimum level that passes the gate.
static LEVEL_THRESHOLD: AtomicU8 = AtomicU8::new(0);

/// Set the global minimum level. Takes effect for all subsequent call sites.
pub fn set_level(level: Level) {
    LEVEL_THRESHOLD.store(level.as_u8(), Ordering::Release);
}

/// Producer-side check consulted before a record is constructed. Call sites
/// skip record construction entirely when this returns false.
#[inline]
pub fn is_logged(level: Level) -> bool {
    level.as_u8() >= LEVEL_THRESHOLD.load(Ordering::Relaxed)
}
