use crate::error::Error;
use crate::hash::Digest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const UNTRACKED: &str = "untracked";
pub const NOT_CHANGED: &str = "not changed";

/// Last known state of a tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "digest", rename_all = "snake_case")]
pub enum FileStatus {
    /// Tracked but never committed or reverted since the last `track`.
    Untracked,
    /// Digest of the content last written to or read from the backup.
    Hash(Digest),
    /// Reset marker left behind by a commit.
    NotChanged,
}

impl FileStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            UNTRACKED => Some(FileStatus::Untracked),
            NOT_CHANGED => Some(FileStatus::NotChanged),
            other => Digest::from_hex(other).map(FileStatus::Hash),
        }
    }

    pub fn digest(&self) -> Option<&Digest> {
        match self {
            FileStatus::Hash(digest) => Some(digest),
            _ => None,
        }
    }

    /// Whether `digest` equals the recorded hash. Sentinels never match.
    pub fn matches(&self, digest: &Digest) -> bool {
        self.digest() == Some(digest)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Untracked => f.write_str(UNTRACKED),
            FileStatus::Hash(digest) => write!(f, "{}", digest),
            FileStatus::NotChanged => f.write_str(NOT_CHANGED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    pub name: String,
    pub status: FileStatus,
    pub tracked_at: DateTime<Utc>,
}

impl TrackedFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FileStatus::Untracked,
            tracked_at: Utc::now(),
        }
    }
}

/// A per-entry failure collected during a batch operation.
#[derive(Debug)]
pub struct EntryFailure {
    pub name: String,
    pub error: Error,
}

#[derive(Debug)]
pub struct CommitOutcome {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub committed: Vec<String>,
    pub failures: Vec<EntryFailure>,
}

impl CommitOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RevertOutcome {
    pub restored: Vec<String>,
    pub failures: Vec<EntryFailure>,
}

impl RevertOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub checked: usize,
    pub mismatches: Vec<String>,
    pub unreadable: Vec<EntryFailure>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty() && self.unreadable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::ContentHasher;

    #[test]
    fn test_tracked_file_creation() {
        let file = TrackedFile::new("test.txt");

        assert_eq!(file.name, "test.txt");
        assert_eq!(file.status, FileStatus::Untracked);
    }

    #[test]
    fn test_status_text_form() {
        let digest = ContentHasher::hash(b"X");

        assert_eq!(FileStatus::Untracked.to_string(), "untracked");
        assert_eq!(FileStatus::NotChanged.to_string(), "not changed");
        assert_eq!(FileStatus::Hash(digest).to_string(), digest.to_hex());
    }

    #[test]
    fn test_status_parse() {
        let digest = ContentHasher::hash(b"X");

        assert_eq!(FileStatus::parse("untracked"), Some(FileStatus::Untracked));
        assert_eq!(FileStatus::parse("not changed"), Some(FileStatus::NotChanged));
        assert_eq!(
            FileStatus::parse(&digest.to_hex()),
            Some(FileStatus::Hash(digest))
        );
        assert_eq!(FileStatus::parse("Not changed"), None);
    }

    #[test]
    fn test_sentinels_never_match() {
        let digest = ContentHasher::hash(b"");

        assert!(FileStatus::Hash(digest).matches(&digest));
        assert!(!FileStatus::Untracked.matches(&digest));
        assert!(!FileStatus::NotChanged.matches(&digest));
    }
}
