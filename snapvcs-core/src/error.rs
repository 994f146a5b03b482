use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Can't read {name}: {source}")]
    Read {
        name: String,
        source: std::io::Error,
    },

    #[error("Can't write {name}: {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },

    #[error("No backup stored for: {0}")]
    NotFound(String),

    #[error("No backup file could be found for: {0}")]
    MissingBackup(String),

    #[error("Revert can't happen because there is no backup at {0}")]
    NoBackup(PathBuf),

    #[error("Backup store unavailable at {path}: {source}")]
    StoreUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not a snapvcs repository: {0}")]
    NotInitialized(PathBuf),

    #[error("Can't append to commit log {path}: {source}")]
    CommitLog {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Discriminant of [`Error`], cheap to copy into reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Read,
    Write,
    NotFound,
    MissingBackup,
    NoBackup,
    StoreUnavailable,
    InvalidPath,
    NotInitialized,
    CommitLog,
    Config,
    Database,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Read { .. } => ErrorKind::Read,
            Error::Write { .. } => ErrorKind::Write,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::MissingBackup(_) => ErrorKind::MissingBackup,
            Error::NoBackup(_) => ErrorKind::NoBackup,
            Error::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            Error::InvalidPath(_) => ErrorKind::InvalidPath,
            Error::NotInitialized(_) => ErrorKind::NotInitialized,
            Error::CommitLog { .. } => ErrorKind::CommitLog,
            Error::Config(_) => ErrorKind::Config,
            Error::Database(_) => ErrorKind::Database,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Read => "read",
            ErrorKind::Write => "write",
            ErrorKind::NotFound => "not-found",
            ErrorKind::MissingBackup => "missing-backup",
            ErrorKind::NoBackup => "no-backup",
            ErrorKind::StoreUnavailable => "store-unavailable",
            ErrorKind::InvalidPath => "invalid-path",
            ErrorKind::NotInitialized => "not-initialized",
            ErrorKind::CommitLog => "commit-log",
            ErrorKind::Config => "config",
            ErrorKind::Database => "database",
            ErrorKind::Io => "io",
        }
    }
}
