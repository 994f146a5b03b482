use crate::error::{Error, Result};
use crate::models::{FileStatus, TrackedFile};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};
use tracing::debug;

/// In-memory map from tracked name to its last known state.
///
/// Names iterate in lexicographic order so listings are stable.
#[derive(Debug, Default, Clone)]
pub struct TrackedFileRegistry {
    files: BTreeMap<String, TrackedFile>,
}

impl TrackedFileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files(files: impl IntoIterator<Item = TrackedFile>) -> Self {
        Self {
            files: files.into_iter().map(|f| (f.name.clone(), f)).collect(),
        }
    }

    /// Track `name` relative to `workdir`.
    ///
    /// A missing file is created empty (along with its parent directories)
    /// before it is registered. Re-tracking a name resets its status to
    /// untracked. Returns whether the file had to be created.
    pub fn track(&mut self, workdir: &Path, name: &str) -> Result<bool> {
        validate_name(name)?;

        let path = workdir.join(name);
        let created = if path.is_file() {
            false
        } else if path.exists() {
            return Err(Error::InvalidPath(format!("{} is not a regular file", name)));
        } else {
            create_empty(&path).map_err(|e| Error::Write {
                name: name.to_string(),
                source: e,
            })?;
            true
        };

        debug!("Tracking {} (created: {})", name, created);
        self.files.insert(name.to_string(), TrackedFile::new(name));
        Ok(created)
    }

    /// Put back the entry `name` had before a `track` call, or drop it if it
    /// wasn't tracked.
    pub fn restore(&mut self, name: &str, previous: Option<TrackedFile>) {
        match previous {
            Some(file) => {
                self.files.insert(name.to_string(), file);
            }
            None => {
                self.files.remove(name);
            }
        }
    }

    /// Returns false if `name` isn't tracked.
    pub fn set_status(&mut self, name: &str, status: FileStatus) -> bool {
        match self.files.get_mut(name) {
            Some(file) => {
                file.status = status;
                true
            }
            None => false,
        }
    }

    pub fn status(&self, name: &str) -> Option<FileStatus> {
        self.files.get(name).map(|f| f.status)
    }

    pub fn get(&self, name: &str) -> Option<&TrackedFile> {
        self.files.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, FileStatus)> + '_ {
        self.files.iter().map(|(name, f)| (name.as_str(), f.status))
    }

    pub fn files(&self) -> impl Iterator<Item = &TrackedFile> + '_ {
        self.files.values()
    }

    /// Snapshot of the tracked names, for loops that mutate the registry.
    pub fn names(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    pub fn set_all(&mut self, status: FileStatus) {
        for file in self.files.values_mut() {
            file.status = status;
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Reject names that would escape or alias the working directory.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidPath("empty file name".to_string()));
    }

    let path = Path::new(name);
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            _ => return Err(Error::InvalidPath(name.to_string())),
        }
    }

    // `components()` drops interior `.` and empty segments, so `a/./b` and
    // `a//b` would otherwise register as aliases of `a/b`.
    if name
        .split(['/', std::path::MAIN_SEPARATOR])
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(Error::InvalidPath(name.to_string()));
    }

    Ok(())
}

fn create_empty(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::File::create(path)?;
    Ok(())
}
