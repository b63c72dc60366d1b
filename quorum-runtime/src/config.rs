use anyhow::Context;
use quorum_core::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of command receipts kept in memory
pub const DEFAULT_RECEIPT_CAPACITY: usize = 1024;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Journal file replayed on open and appended to on every accepted
    /// command. Without one the journal lives in memory.
    pub journal_path: Option<PathBuf>,

    /// Maximum number of receipts retained; the oldest are evicted first
    pub receipt_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            journal_path: None,
            receipt_capacity: DEFAULT_RECEIPT_CAPACITY,
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, StorageError> {
        serde_json::from_str(json).map_err(|e| StorageError::Config(e.to_string()))
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, StorageError> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn with_journal(mut self, path: impl Into<PathBuf>) -> Self {
        self.journal_path = Some(path.into());
        self
    }

    pub fn with_receipt_capacity(mut self, capacity: usize) -> Self {
        self.receipt_capacity = capacity;
        self
    }
}
