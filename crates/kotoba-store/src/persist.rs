use std::fs;
use std::path::Path;

use kotoba_types::card::CardRecord;

use crate::{Store, StoreError};

impl Store {
    /// Append one record to the JSON store and its row to the CSV export.
    ///
    /// JSON first, then CSV. Each file is rewritten through a sibling temp
    /// file and renamed into place.
    pub fn append(&self, record: &CardRecord) -> Result<(), StoreError> {
        self.append_json(record)?;
        self.append_csv(record)?;
        Ok(())
    }

    fn append_json(&self, record: &CardRecord) -> Result<(), StoreError> {
        let mut records: Vec<CardRecord> = if self.data_json.exists() {
            match fs::read_to_string(&self.data_json)
                .map_err(StoreError::from)
                .and_then(|content| Ok(serde_json::from_str(&content)?))
            {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("could not parse existing data.json, starting fresh: {e}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        records.push(record.clone());

        let serialized = serde_json::to_string_pretty(&records)?;
        write_atomic(&self.data_json, serialized.as_bytes())?;
        Ok(())
    }

    fn append_csv(&self, record: &CardRecord) -> Result<(), StoreError> {
        let existing = if self.csv_path.exists() {
            fs::read(&self.csv_path)?
        } else {
            Vec::new()
        };

        // Header only when the export is new.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(existing.is_empty())
            .from_writer(Vec::new());
        writer.serialize(&record.anki_fields)?;
        let row = writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        let mut content = existing;
        content.extend_from_slice(&row);
        write_atomic(&self.csv_path, &content)?;
        Ok(())
    }
}

/// Write via a sibling temp file and rename over the destination.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
