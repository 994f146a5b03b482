pub mod check;
pub mod commit;
pub mod init;
pub mod revert;
pub mod status;
pub mod track;

use crate::display::ConsoleReporter;
use anyhow::{Context, Result};
use snapvcs_core::{ErrorKind, Repository};
use std::path::PathBuf;

pub fn get_root(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("Can't determine the current directory"),
    }
}

pub fn open_repo(root: Option<PathBuf>) -> Result<Repository<ConsoleReporter>> {
    let root = get_root(root)?;

    match Repository::open(&root) {
        Ok(repo) => Ok(repo.with_reporter(ConsoleReporter)),
        Err(e) if e.kind() == ErrorKind::NotInitialized => {
            anyhow::bail!(
                "No snapvcs repository at {}. Run 'snapvcs init' first.",
                root.display()
            )
        }
        Err(e) => Err(e).with_context(|| format!("Failed to open repository at {}", root.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_root_prefers_custom_path() {
        let root = get_root(Some(PathBuf::from("/tmp/project"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/project"));
    }

    #[test]
    fn test_open_repo_requires_init() {
        let temp_dir = TempDir::new().unwrap();

        let err = open_repo(Some(temp_dir.path().to_path_buf())).err().unwrap();
        assert!(err.to_string().contains("snapvcs init"));

        Repository::init(temp_dir.path()).unwrap();
        assert!(open_repo(Some(temp_dir.path().to_path_buf())).is_ok());
    }
}
