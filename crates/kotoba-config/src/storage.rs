use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the JSON store and the CSV export
    pub out_dir: PathBuf,
    /// Directory holding generated images and audio
    pub media_dir: PathBuf,
}

impl StorageConfig {
    pub fn new() -> Self {
        let out_dir = env::var("KOTOBA_OUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("out"));

        let media_dir = env::var("KOTOBA_MEDIA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("media"));

        StorageConfig { out_dir, media_dir }
    }

    pub fn data_json_path(&self) -> PathBuf {
        self.out_dir.join("data.json")
    }

    pub fn csv_path(&self) -> PathBuf {
        self.out_dir.join("anki.csv")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}
