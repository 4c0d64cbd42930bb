//! Tracked working directory for shell steps.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::core::path::resolve;

/// The single "current directory" of a session.
///
/// Child shells get a copy of this value; only directory-change steps write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    current: PathBuf,
}

impl WorkingDirectory {
    /// Track `path`, which should be absolute.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            current: path.into(),
        }
    }

    /// Start from the process's current directory.
    pub fn from_process() -> Result<Self> {
        let cwd = std::env::current_dir().context("read current directory")?;
        Ok(Self::new(cwd))
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Resolve `candidate` against the tracked directory.
    pub fn resolve(&self, candidate: &str) -> Result<PathBuf> {
        resolve(&self.current, candidate).with_context(|| format!("resolve {candidate}"))
    }

    /// Switch to `path` if it exists and is a directory.
    ///
    /// On error the tracked directory is unchanged.
    pub fn change_to(&mut self, path: &Path) -> Result<()> {
        let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
        if !meta.is_dir() {
            bail!("{} is not a directory", path.display());
        }
        debug!(from = %self.current.display(), to = %path.display(), "changing directory");
        self.current = path.to_path_buf();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_to_existing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("child")).expect("mkdir");
        let mut wd = WorkingDirectory::new(temp.path());

        let target = wd.resolve("child").expect("resolve");
        wd.change_to(&target).expect("change");
        assert_eq!(wd.current(), temp.path().join("child"));
    }

    #[test]
    fn change_to_missing_leaves_value() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut wd = WorkingDirectory::new(temp.path());

        let target = wd.resolve("nope").expect("resolve");
        assert!(wd.change_to(&target).is_err());
        assert_eq!(wd.current(), temp.path());
    }

    #[test]
    fn change_to_file_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("file.txt"), "x").expect("write");
        let mut wd = WorkingDirectory::new(temp.path());

        let target = wd.resolve("file.txt").expect("resolve");
        let err = wd.change_to(&target).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
        assert_eq!(wd.current(), temp.path());
    }

    #[test]
    fn resolve_parent_of_tracked() {
        let wd = WorkingDirectory::new("/home/user/project");
        assert_eq!(
            wd.resolve("..").expect("resolve"),
            PathBuf::from("/home/user")
        );
    }
}
