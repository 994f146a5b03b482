use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Append-only log with one marker line per commit. Never read back.
pub struct CommitLog {
    path: PathBuf,
}

impl CommitLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the log if it is missing. Existing content is kept.
    pub fn touch(&self) -> Result<()> {
        self.open().map(drop)
    }

    pub fn append(&self, id: &Uuid, timestamp: &DateTime<Utc>, files: usize) -> Result<()> {
        let mut file = self.open()?;
        writeln!(file, "commit {} {} files={}", id, timestamp.to_rfc3339(), files).map_err(
            |e| Error::CommitLog {
                path: self.path.clone(),
                source: e,
            },
        )
    }

    fn open(&self) -> Result<std::fs::File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::CommitLog {
                path: self.path.clone(),
                source: e,
            })
    }
}
