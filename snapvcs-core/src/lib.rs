//! # snapvcs-core
//!
//! Core library for snapvcs - a minimal local version control tool.
//!
//! Tracks files inside a working directory, snapshots their content into a
//! single-slot backup store, restores them from that snapshot, and checks the
//! working copy against the recorded content hashes.

pub mod backup;
pub mod commit_log;
pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod index;
pub mod integrity;
pub mod models;
pub mod registry;
pub mod report;
pub mod repository;

pub use backup::BackupStore;
pub use config::RepoConfig;
pub use error::{Error, ErrorKind, Result};
pub use hash::{ContentHasher, Digest};
pub use models::{CommitOutcome, FileStatus, IntegrityReport, RevertOutcome, TrackedFile};
pub use registry::TrackedFileRegistry;
pub use report::{Event, MemoryReporter, Reporter, TracingReporter};
pub use repository::Repository;
