//! Commit and revert over the tracked-file registry
//!
//! Both operations are best-effort: a failure on one entry is reported and
//! collected, and the loop moves on to the next entry. Only a missing backup
//! root (revert) or an unwritable commit log (commit) fails the whole call.

use crate::backup::BackupStore;
use crate::commit_log::CommitLog;
use crate::error::{Error, Result};
use crate::hash::{ContentHasher, Digest};
use crate::models::{CommitOutcome, EntryFailure, FileStatus, RevertOutcome};
use crate::registry::TrackedFileRegistry;
use crate::report::{Event, Reporter};
use chrono::Utc;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

pub struct SnapshotEngine<'a> {
    workdir: &'a Path,
    store: &'a BackupStore,
    registry: &'a mut TrackedFileRegistry,
}

impl<'a> SnapshotEngine<'a> {
    pub fn new(
        workdir: &'a Path,
        store: &'a BackupStore,
        registry: &'a mut TrackedFileRegistry,
    ) -> Self {
        Self {
            workdir,
            store,
            registry,
        }
    }

    /// Copy every tracked file into the backup store and record its digest.
    ///
    /// Once all entries are processed a marker is appended to `log` and every
    /// status is reset to [`FileStatus::NotChanged`], unless `retain_hash` is
    /// set, in which case the digests stay as the recorded status. If the log
    /// can't be appended the reset is skipped and the error is returned.
    pub fn commit(
        &mut self,
        log: &CommitLog,
        retain_hash: bool,
        reporter: &mut dyn Reporter,
    ) -> Result<CommitOutcome> {
        let id = Uuid::new_v4();
        let timestamp = Utc::now();
        let mut committed = Vec::new();
        let mut failures = Vec::new();

        for name in self.registry.names() {
            match self.snapshot_entry(&name) {
                Ok(digest) => {
                    debug!("Committed {} at {}", name, digest);
                    self.registry.set_status(&name, FileStatus::Hash(digest));
                    committed.push(name);
                }
                Err(error) => {
                    reporter.report(&Event::failed(Some(name.as_str()), &error));
                    failures.push(EntryFailure { name, error });
                }
            }
        }

        if let Err(e) = log.append(&id, &timestamp, committed.len()) {
            reporter.report(&Event::failed(None, &e));
            return Err(e);
        }

        reporter.report(&Event::Committed {
            id: id.to_string(),
            files: committed.len(),
        });

        if !retain_hash {
            self.registry.set_all(FileStatus::NotChanged);
        }

        info!(
            "Commit {} stored {} file(s), {} failure(s)",
            id,
            committed.len(),
            failures.len()
        );

        Ok(CommitOutcome {
            id,
            timestamp,
            committed,
            failures,
        })
    }

    /// Restore every tracked file from its backup slot.
    ///
    /// Each restored entry's status becomes the digest of the restored bytes.
    pub fn revert(&mut self, reporter: &mut dyn Reporter) -> Result<RevertOutcome> {
        if !self.store.root_exists() {
            let error = Error::NoBackup(self.store.root().to_path_buf());
            reporter.report(&Event::failed(None, &error));
            return Err(error);
        }

        let mut outcome = RevertOutcome::default();

        for name in self.registry.names() {
            if !self.store.exists(&name) {
                let error = Error::MissingBackup(name.clone());
                reporter.report(&Event::failed(Some(name.as_str()), &error));
                outcome.failures.push(EntryFailure { name, error });
                continue;
            }

            match self.restore_entry(&name) {
                Ok(digest) => {
                    debug!("Restored {} at {}", name, digest);
                    self.registry.set_status(&name, FileStatus::Hash(digest));
                    reporter.report(&Event::Reverted { name: name.clone() });
                    outcome.restored.push(name);
                }
                Err(error) => {
                    reporter.report(&Event::failed(Some(name.as_str()), &error));
                    outcome.failures.push(EntryFailure { name, error });
                }
            }
        }

        info!(
            "Reverted {} file(s), {} failure(s)",
            outcome.restored.len(),
            outcome.failures.len()
        );

        Ok(outcome)
    }

    fn snapshot_entry(&self, name: &str) -> Result<Digest> {
        let content = fs::read(self.workdir.join(name)).map_err(|e| Error::Read {
            name: name.to_string(),
            source: e,
        })?;

        self.store.put(name, &content)?;
        Ok(ContentHasher::hash(&content))
    }

    fn restore_entry(&self, name: &str) -> Result<Digest> {
        let content = self.store.get(name)?;
        let path = self.workdir.join(name);

        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &content)
        };
        write(&path).map_err(|e| Error::Write {
            name: name.to_string(),
            source: e,
        })?;

        Ok(ContentHasher::hash(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::report::MemoryReporter;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        store: BackupStore,
        log: CommitLog,
        registry: TrackedFileRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let store = BackupStore::new(dir.path().join(".backup"));
            let log = CommitLog::new(dir.path().join(".commits"));
            Self {
                dir,
                store,
                log,
                registry: TrackedFileRegistry::new(),
            }
        }

        fn write(&self, name: &str, content: &str) {
            fs::write(self.dir.path().join(name), content).unwrap();
        }

        fn read(&self, name: &str) -> String {
            fs::read_to_string(self.dir.path().join(name)).unwrap()
        }

        fn track(&mut self, name: &str) {
            self.registry.track(self.dir.path(), name).unwrap();
        }

        fn commit(&mut self, retain_hash: bool, reporter: &mut MemoryReporter) -> CommitOutcome {
            SnapshotEngine::new(self.dir.path(), &self.store, &mut self.registry)
                .commit(&self.log, retain_hash, reporter)
                .unwrap()
        }

        fn revert(&mut self, reporter: &mut MemoryReporter) -> Result<RevertOutcome> {
            SnapshotEngine::new(self.dir.path(), &self.store, &mut self.registry).revert(reporter)
        }
    }

    #[test]
    fn test_commit_backs_up_every_file() {
        let mut fx = Fixture::new();
        fx.write("a.txt", "X");
        fx.track("a.txt");
        fx.track("b.txt");
        let mut reporter = MemoryReporter::new();

        let outcome = fx.commit(false, &mut reporter);

        assert_eq!(outcome.committed, vec!["a.txt", "b.txt"]);
        assert!(outcome.is_complete());
        assert_eq!(fx.store.get("a.txt").unwrap(), b"X");
        assert_eq!(fx.store.get("b.txt").unwrap(), b"");
        assert!(fx.log.exists());
    }

    #[test]
    fn test_commit_resets_status_to_not_changed() {
        let mut fx = Fixture::new();
        fx.write("a.txt", "X");
        fx.track("a.txt");

        fx.commit(false, &mut MemoryReporter::new());

        assert_eq!(fx.registry.status("a.txt"), Some(FileStatus::NotChanged));
    }

    #[test]
    fn test_commit_can_retain_hash() {
        let mut fx = Fixture::new();
        fx.write("a.txt", "X");
        fx.track("a.txt");

        fx.commit(true, &mut MemoryReporter::new());

        assert_eq!(
            fx.registry.status("a.txt"),
            Some(FileStatus::Hash(ContentHasher::hash(b"X")))
        );
    }

    #[test]
    fn test_commit_continues_past_unreadable_file() {
        let mut fx = Fixture::new();
        fx.track("a.txt");
        fx.track("b.txt");
        fs::remove_file(fx.dir.path().join("a.txt")).unwrap();
        let mut reporter = MemoryReporter::new();

        let outcome = fx.commit(false, &mut reporter);

        assert_eq!(outcome.committed, vec!["b.txt"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].name, "a.txt");
        assert_eq!(reporter.failure_kinds(), vec![ErrorKind::Read]);
        assert!(!fx.store.exists("a.txt"));
        assert!(fx.store.exists("b.txt"));
    }

    #[test]
    fn test_commit_reports_store_failure_and_continues() {
        let mut fx = Fixture::new();
        fs::create_dir(fx.dir.path().join("docs")).unwrap();
        fx.write("docs/a.txt", "X");
        fx.write("b.txt", "Y");
        fx.track("docs/a.txt");
        fx.track("b.txt");
        fs::create_dir(fx.store.root()).unwrap();
        fs::write(fx.store.root().join("docs"), "in the way").unwrap();
        let mut reporter = MemoryReporter::new();

        let outcome = fx.commit(true, &mut reporter);

        assert_eq!(outcome.committed, vec!["b.txt"]);
        assert_eq!(outcome.failures[0].name, "docs/a.txt");
        assert_eq!(reporter.failure_kinds(), vec![ErrorKind::StoreUnavailable]);
        assert_eq!(fx.store.get("b.txt").unwrap(), b"Y");
        assert_eq!(fx.registry.status("docs/a.txt"), Some(FileStatus::Untracked));
        assert!(fx.log.exists());
    }

    #[test]
    fn test_commit_log_failure_skips_reset() {
        let mut fx = Fixture::new();
        fx.write("a.txt", "X");
        fx.track("a.txt");
        fs::create_dir(fx.log.path()).unwrap();
        let mut reporter = MemoryReporter::new();

        let err = SnapshotEngine::new(fx.dir.path(), &fx.store, &mut fx.registry)
            .commit(&fx.log, false, &mut reporter)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CommitLog);
        assert_eq!(reporter.failure_kinds(), vec![ErrorKind::CommitLog]);
        assert_eq!(
            fx.registry.status("a.txt"),
            Some(FileStatus::Hash(ContentHasher::hash(b"X")))
        );
    }

    #[test]
    fn test_revert_restores_committed_content() {
        let mut fx = Fixture::new();
        fx.write("a.txt", "X");
        fx.track("a.txt");
        fx.commit(false, &mut MemoryReporter::new());
        fx.write("a.txt", "Y");
        let mut reporter = MemoryReporter::new();

        let outcome = fx.revert(&mut reporter).unwrap();

        assert_eq!(outcome.restored, vec!["a.txt"]);
        assert_eq!(fx.read("a.txt"), "X");
        assert_eq!(
            fx.registry.status("a.txt"),
            Some(FileStatus::Hash(ContentHasher::hash(b"X")))
        );
        assert_eq!(
            reporter.events(),
            &[Event::Reverted {
                name: "a.txt".to_string()
            }]
        );
    }

    #[test]
    fn test_revert_recreates_deleted_file() {
        let mut fx = Fixture::new();
        fs::create_dir(fx.dir.path().join("docs")).unwrap();
        fx.write("docs/notes.md", "keep me");
        fx.track("docs/notes.md");
        fx.commit(false, &mut MemoryReporter::new());
        fs::remove_dir_all(fx.dir.path().join("docs")).unwrap();

        fx.revert(&mut MemoryReporter::new()).unwrap();

        assert_eq!(fx.read("docs/notes.md"), "keep me");
    }

    #[test]
    fn test_revert_without_backup_root_touches_nothing() {
        let mut fx = Fixture::new();
        fx.write("a.txt", "Y");
        fx.track("a.txt");
        let mut reporter = MemoryReporter::new();

        let err = fx.revert(&mut reporter).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoBackup);
        assert_eq!(reporter.failure_kinds(), vec![ErrorKind::NoBackup]);
        assert_eq!(fx.read("a.txt"), "Y");
        assert_eq!(fx.registry.status("a.txt"), Some(FileStatus::Untracked));
    }

    #[test]
    fn test_revert_reports_missing_backup_and_continues() {
        let mut fx = Fixture::new();
        fx.write("a.txt", "X");
        fx.track("a.txt");
        fx.commit(false, &mut MemoryReporter::new());
        fx.write("late.txt", "new");
        fx.track("late.txt");
        let mut reporter = MemoryReporter::new();

        let outcome = fx.revert(&mut reporter).unwrap();

        assert_eq!(outcome.restored, vec!["a.txt"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].error.kind(), ErrorKind::MissingBackup);
        assert_eq!(reporter.failure_kinds(), vec![ErrorKind::MissingBackup]);
        assert_eq!(fx.read("late.txt"), "new");
        assert_eq!(fx.registry.status("late.txt"), Some(FileStatus::Untracked));
    }

    #[test]
    fn test_revert_reports_write_failure_and_continues() {
        let mut fx = Fixture::new();
        fx.write("a.txt", "X");
        fx.write("b.txt", "Y");
        fx.track("a.txt");
        fx.track("b.txt");
        fx.commit(false, &mut MemoryReporter::new());
        fs::remove_file(fx.dir.path().join("a.txt")).unwrap();
        fs::create_dir(fx.dir.path().join("a.txt")).unwrap();
        fx.write("b.txt", "changed");
        let mut reporter = MemoryReporter::new();

        let outcome = fx.revert(&mut reporter).unwrap();

        assert_eq!(outcome.restored, vec!["b.txt"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].name, "a.txt");
        assert_eq!(reporter.failure_kinds(), vec![ErrorKind::Write]);
        assert_eq!(fx.read("b.txt"), "Y");
        assert_eq!(fx.registry.status("a.txt"), Some(FileStatus::NotChanged));
    }
}
