//! Single-slot backup store
//!
//! Keeps exactly one copy of each tracked file under the backup directory,
//! stored at the same relative path as the working copy. Writing a slot
//! replaces whatever was there; no earlier versions are kept.

use crate::error::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct BackupStore {
    root: PathBuf,
}

impl BackupStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn root_exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn slot_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.slot_path(name).is_file()
    }

    /// Write `content` into the slot for `name`, replacing any prior backup.
    ///
    /// The backup directory (and any nested directory the name needs) is
    /// created on first use. Content goes to a temp file next to the slot
    /// and is renamed into place, so a failed write leaves the old slot intact.
    pub fn put(&self, name: &str, content: &[u8]) -> Result<()> {
        let slot = self.slot_path(name);
        let parent = slot.parent().unwrap_or(&self.root).to_path_buf();

        fs::create_dir_all(&parent).map_err(|e| Error::StoreUnavailable {
            path: parent.clone(),
            source: e,
        })?;

        let file_name = slot
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidPath(name.to_string()))?;
        let temp_path = parent.join(format!(".{}.tmp-{}", file_name, std::process::id()));

        let write_result = (|| -> io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content)?;
            file.sync_all()?;
            Ok(())
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::Write {
                name: name.to_string(),
                source: e,
            });
        }

        fs::rename(&temp_path, &slot).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Error::Write {
                name: name.to_string(),
                source: e,
            }
        })?;

        debug!("Backed up {} ({} bytes)", name, content.len());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Vec<u8>> {
        match fs::read(self.slot_path(name)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(name.to_string())),
            Err(e) => Err(Error::Read {
                name: name.to_string(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_put_creates_backup_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = BackupStore::new(temp_dir.path().join(".backup"));

        assert!(!store.root_exists());
        store.put("a.txt", b"X").unwrap();

        assert!(store.root_exists());
        assert!(store.exists("a.txt"));
        assert_eq!(store.get("a.txt").unwrap(), b"X");
    }

    #[test]
    fn test_put_overwrites_single_slot() {
        let temp_dir = TempDir::new().unwrap();
        let store = BackupStore::new(temp_dir.path().join(".backup"));

        store.put("a.txt", b"first").unwrap();
        store.put("a.txt", b"second").unwrap();

        assert_eq!(store.get("a.txt").unwrap(), b"second");
        let entries: Vec<_> = fs::read_dir(store.root()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_nested_names_keep_structure() {
        let temp_dir = TempDir::new().unwrap();
        let store = BackupStore::new(temp_dir.path().join(".backup"));

        store.put("src/lib.rs", b"pub fn f() {}").unwrap();

        assert!(store.root().join("src").join("lib.rs").is_file());
        assert_eq!(store.get("src/lib.rs").unwrap(), b"pub fn f() {}");
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = BackupStore::new(temp_dir.path().join(".backup"));

        assert!(!store.exists("nope.txt"));
        let err = store.get("nope.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_unavailable_store() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let store = BackupStore::new(blocker.join(".backup"));

        let err = store.put("a.txt", b"X").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }
}
