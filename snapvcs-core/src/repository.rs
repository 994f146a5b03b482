use crate::backup::BackupStore;
use crate::commit_log::CommitLog;
use crate::config::RepoConfig;
use crate::engine::SnapshotEngine;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::integrity::IntegrityChecker;
use crate::models::{CommitOutcome, FileStatus, IntegrityReport, RevertOutcome, TrackedFile};
use crate::registry::TrackedFileRegistry;
use crate::report::{Event, Reporter, TracingReporter};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// A working directory under snapvcs control.
///
/// Owns the registry, the backup store and the commit log, and routes every
/// status line through its [`Reporter`]. Repositories opened from disk write
/// the registry back to the index after each mutating operation.
pub struct Repository<R: Reporter = TracingReporter> {
    root: PathBuf,
    config: RepoConfig,
    registry: TrackedFileRegistry,
    store: BackupStore,
    log: CommitLog,
    index: Option<Index>,
    reporter: R,
}

impl Repository<TracingReporter> {
    /// Create the repository layout under `root` and open it.
    ///
    /// Creates `root` itself if needed, the backup directory and an empty
    /// commit log. Running it on an existing repository changes nothing.
    pub fn init<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let config = RepoConfig::load(&root)?;
        let backup_dir = root.join(&config.backup_dir);
        fs::create_dir_all(&backup_dir).map_err(|e| Error::StoreUnavailable {
            path: backup_dir.clone(),
            source: e,
        })?;
        CommitLog::new(root.join(&config.commit_log)).touch()?;

        info!("Initiated snapvcs repository at {}", root.display());
        Self::open(root)
    }

    /// Open an initialized repository and load its registry from the index.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        let config = RepoConfig::load(&root)?;
        let log = CommitLog::new(root.join(&config.commit_log));
        if !log.exists() {
            return Err(Error::NotInitialized(root));
        }

        let index = Index::new(root.join(&config.index))?;
        let registry = index.load()?;

        Ok(Self {
            store: BackupStore::new(root.join(&config.backup_dir)),
            root,
            config,
            registry,
            log,
            index: Some(index),
            reporter: TracingReporter,
        })
    }

    /// A repository whose registry lives only as long as this value.
    ///
    /// Nothing is created on disk until the first `track` or `commit`.
    pub fn in_memory<P: Into<PathBuf>>(root: P, config: RepoConfig) -> Self {
        let root = root.into();
        Self {
            store: BackupStore::new(root.join(&config.backup_dir)),
            log: CommitLog::new(root.join(&config.commit_log)),
            root,
            config,
            registry: TrackedFileRegistry::new(),
            index: None,
            reporter: TracingReporter,
        }
    }
}

impl<R: Reporter> Repository<R> {
    pub fn with_reporter<S: Reporter>(self, reporter: S) -> Repository<S> {
        Repository {
            root: self.root,
            config: self.config,
            registry: self.registry,
            store: self.store,
            log: self.log,
            index: self.index,
            reporter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn store(&self) -> &BackupStore {
        &self.store
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    pub fn status(&self, name: &str) -> Option<FileStatus> {
        self.registry.status(name)
    }

    pub fn tracked_files(&self) -> impl Iterator<Item = &TrackedFile> + '_ {
        self.registry.files()
    }

    pub fn tracked_count(&self) -> usize {
        self.registry.len()
    }

    /// Start tracking `name`, creating an empty file if it doesn't exist.
    ///
    /// Returns whether the file was created. If the index can't be saved the
    /// registry entry is rolled back and the index error is returned; that
    /// failure is reported without a name.
    pub fn track(&mut self, name: &str) -> Result<bool> {
        let previous = self.registry.get(name).cloned();
        let result = self
            .check_not_reserved(name)
            .and_then(|_| self.registry.track(&self.root, name));

        let created = match result {
            Ok(created) => created,
            Err(e) => {
                self.reporter.report(&Event::failed(Some(name), &e));
                return Err(e);
            }
        };

        if let Err(e) = self.sync_index() {
            self.registry.restore(name, previous);
            return Err(e);
        }

        self.reporter.report(&Event::Tracked {
            name: name.to_string(),
            created,
        });
        Ok(created)
    }

    pub fn commit(&mut self) -> Result<CommitOutcome> {
        let result = SnapshotEngine::new(&self.root, &self.store, &mut self.registry).commit(
            &self.log,
            self.config.commit.retain_hash,
            &mut self.reporter,
        );
        self.sync_index()?;
        result
    }

    pub fn revert(&mut self) -> Result<RevertOutcome> {
        let result =
            SnapshotEngine::new(&self.root, &self.store, &mut self.registry).revert(&mut self.reporter);
        self.sync_index()?;
        result
    }

    pub fn integrity_check(&mut self) -> IntegrityReport {
        IntegrityChecker::new(&self.root, &self.registry).check(&mut self.reporter)
    }

    fn check_not_reserved(&self, name: &str) -> Result<()> {
        let first = match Path::new(name).components().next() {
            Some(Component::Normal(first)) => first,
            _ => return Ok(()),
        };

        if self
            .config
            .reserved_names()
            .iter()
            .any(|reserved| first == *reserved)
        {
            return Err(Error::InvalidPath(format!(
                "{} is reserved for repository data",
                name
            )));
        }
        Ok(())
    }

    fn sync_index(&mut self) -> Result<()> {
        if let Some(index) = self.index.as_mut() {
            index.save(&self.registry).map_err(|e| {
                self.reporter.report(&Event::failed(None, &e));
                e
            })?;
        }
        Ok(())
    }
}
