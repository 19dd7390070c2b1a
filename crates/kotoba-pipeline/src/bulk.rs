use kotoba_config::Credentials;
use kotoba_types::card::CardRecord;
use serde::Serialize;

use crate::{Pipeline, ProgressSender};

/// Outcome of a bulk run over newline-delimited inputs.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
    pub results: Vec<CardRecord>,
    pub errors: Vec<BulkError>,
}

/// One failed line, keyed by the original input.
#[derive(Debug, Clone, Serialize)]
pub struct BulkError {
    pub input: String,
    pub error: String,
}

impl Pipeline {
    /// Process many inputs strictly one at a time.
    ///
    /// Sequential on purpose: upstream rate limits make fan-out
    /// counterproductive here. A failing line is recorded and the run
    /// continues with the next line; blank lines are dropped before
    /// counting.
    pub async fn process_lines<I, S>(
        &self,
        lines: I,
        credentials: Option<&Credentials>,
        progress: Option<&ProgressSender>,
    ) -> BulkReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .filter(|line| !line.trim().is_empty())
            .collect();

        let total = lines.len();
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for line in lines {
            match self.process_input(&line, credentials, progress).await {
                Ok(Some(record)) => results.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("failed to process {line:?}: {e}");
                    errors.push(BulkError {
                        input: line,
                        error: e.to_string(),
                    });
                }
            }
        }

        BulkReport {
            total,
            processed: results.len(),
            failed: errors.len(),
            results,
            errors,
        }
    }
}
