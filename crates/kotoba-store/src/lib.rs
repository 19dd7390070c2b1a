use std::path::PathBuf;

use kotoba_config::storage::StorageConfig;
use thiserror::Error;

pub mod persist;
pub mod query;

pub use query::{CardPage, Pagination, StoreStats};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// File-backed card store: one JSON array plus a CSV export.
///
/// Every operation reloads the file; there is no cache and no index. Writes
/// go through a temp file and an atomic rename, so a crash mid-write never
/// leaves a torn store. Concurrent writers from separate processes still
/// race (last writer wins); this tool is single-writer by design.
#[derive(Debug, Clone)]
pub struct Store {
    out_dir: PathBuf,
    media_dir: PathBuf,
    data_json: PathBuf,
    csv_path: PathBuf,
}

impl Store {
    pub fn new(config: &StorageConfig) -> Self {
        Store {
            out_dir: config.out_dir.clone(),
            media_dir: config.media_dir.clone(),
            data_json: config.data_json_path(),
            csv_path: config.csv_path(),
        }
    }

    /// Create the output and media directories. Idempotent; called once at
    /// startup rather than as a load-time side effect.
    pub fn init(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.out_dir)?;
        std::fs::create_dir_all(&self.media_dir)?;
        Ok(())
    }

    pub fn media_dir(&self) -> &PathBuf {
        &self.media_dir
    }

    pub fn data_json_path(&self) -> &PathBuf {
        &self.data_json
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
