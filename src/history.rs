use crate::error::Result;
use crate::models::DownloadRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Append-only list of download totals persisted as a JSON array.
///
/// The file is rewritten in place on every append. Concurrent writers are not
/// coordinated; the last one wins.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored records in append order.
    ///
    /// A missing file is an empty history. So is a file whose content does not
    /// parse (bad JSON, bad UTF-8, bad timestamps), after a warning. Only
    /// failures to read the file are errors.
    pub fn load(&self) -> Result<Vec<DownloadRecord>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No download history yet");
            return Ok(Vec::new());
        }

        let raw = fs::read(&self.path)?;
        match serde_json::from_slice::<Vec<DownloadRecord>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not decode download history, starting fresh"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Stamp `count` with the current time, append it and rewrite the file.
    pub fn append(&self, count: u64) -> Result<Vec<DownloadRecord>> {
        self.append_record(DownloadRecord::now(count))
    }

    pub fn append_record(&self, record: DownloadRecord) -> Result<Vec<DownloadRecord>> {
        let mut history = self.load()?;
        history.push(record);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&history)?)?;

        info!(
            path = %self.path.display(),
            records = history.len(),
            "Download history updated"
        );
        Ok(history)
    }
}
