//! Repository configuration
//!
//! Loaded from `<root>/.snapvcs.toml`. Every key is optional; a missing file
//! yields the default layout (`.backup/`, `.commits`, `.snapvcs.db`).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};

pub const CONFIG_FILE: &str = ".snapvcs.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Directory holding one backup slot per tracked name
    pub backup_dir: String,
    /// Append-only commit marker log
    pub commit_log: String,
    /// SQLite file persisting the tracked-file registry
    pub index: String,
    pub commit: CommitConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Keep the computed digest as the post-commit status instead of
    /// resetting every entry to "not changed".
    pub retain_hash: bool,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            backup_dir: ".backup".to_string(),
            commit_log: ".commits".to_string(),
            index: ".snapvcs.db".to_string(),
            commit: CommitConfig::default(),
        }
    }
}

impl RepoConfig {
    /// Load the config for the repository at `root`.
    ///
    /// Returns the defaults if the file doesn't exist, and Err if it exists
    /// but is malformed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: RepoConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_retain_hash(mut self, retain_hash: bool) -> Self {
        self.commit.retain_hash = retain_hash;
        self
    }

    /// Top-level names the repository uses for its own bookkeeping.
    pub fn reserved_names(&self) -> [&str; 4] {
        [
            self.backup_dir.as_str(),
            self.commit_log.as_str(),
            self.index.as_str(),
            CONFIG_FILE,
        ]
    }

    fn validate(&self) -> Result<()> {
        let names = [
            ("backup_dir", &self.backup_dir),
            ("commit_log", &self.commit_log),
            ("index", &self.index),
        ];

        for (key, value) in names {
            let mut components = Path::new(value.as_str()).components();
            let single = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if !single {
                return Err(Error::Config(format!(
                    "{} must be a plain file name, got {:?}",
                    key, value
                )));
            }
        }

        if self.backup_dir == self.commit_log
            || self.backup_dir == self.index
            || self.commit_log == self.index
        {
            return Err(Error::Config(
                "backup_dir, commit_log and index must be distinct".to_string(),
            ));
        }

        Ok(())
    }
}
