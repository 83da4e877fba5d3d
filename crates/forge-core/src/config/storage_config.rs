use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Knowledge-store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Dimensionality of the semantic store's embedder.
    pub embedding_dimensions: usize,
    /// SQLite file for corrections and graph patterns. In-memory when unset.
    pub sqlite_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            embedding_dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            sqlite_path: None,
        }
    }
}
