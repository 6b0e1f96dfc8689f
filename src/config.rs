// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Configuration file types and parsing.
//!
//! JSON5 configuration format supporting comments and trailing commas.

use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Logger configuration (JSON5 file format)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Output directory, concatenated verbatim with the file name; must be
    /// empty (current directory) or end with a path separator.
    #[serde(default)]
    pub directory: String,

    /// Stem of the output files: `{directory}{file_name}{n}.txt`
    pub file_name: String,

    /// Roll to the next file index once the current file exceeds this many
    /// MiB.
    pub roll_size_mb: u32,

    /// Queue discipline for the producer/consumer handoff
    #[serde(default)]
    pub queue: QueueConfig,

    /// Initial minimum level for the gate
    #[serde(default)]
    pub level: Level,
}

/// Which handoff discipline the service runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QueueConfig {
    /// Unbounded queue; no record is ever dropped.
    Guaranteed,
    /// Bounded ring; overruns displace unread records.
    NonGuaranteed { ring_budget_mb: u32 },
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig::Guaranteed
    }
}

impl Config {
    /// Load configuration from a JSON5 file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_name.is_empty() {
            return Err(ConfigError::EmptyFileName);
        }
        if !self.directory.is_empty() && !self.directory.ends_with(std::path::MAIN_SEPARATOR) {
            return Err(ConfigError::UnterminatedDirectory {
                directory: self.directory.clone(),
            });
        }
        if self.roll_size_mb == 0 {
            return Err(ConfigError::ZeroRollSize);
        }
        if let QueueConfig::NonGuaranteed { ring_budget_mb } = self.queue {
            if ring_budget_mb == 0 {
                return Err(ConfigError::ZeroRingBudget);
            }
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    IoError(std::path::PathBuf, String),
    ParseError(String),
    EmptyFileName,
    UnterminatedDirectory { directory: String },
    ZeroRollSize,
    ZeroRingBudget,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, msg) => {
                write!(
                    f,
                    "failed to read config file '{}': {}",
                    path.display(),
                    msg
                )
            }
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::EmptyFileName => write!(f, "file_name must not be empty"),
            ConfigError::UnterminatedDirectory { directory } => {
                write!(
                    f,
                    "directory '{}' must end with a path separator",
                    directory
                )
            }
            ConfigError::ZeroRollSize => write!(f, "roll_size_mb must be at least 1"),
            ConfigError::ZeroRingBudget => write!(f, "ring_budget_mb must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
