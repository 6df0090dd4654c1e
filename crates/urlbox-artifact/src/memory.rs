//! In-memory filesystem

use crate::storage::Filesystem;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory filesystem.
///
/// This is primarily for testing. Paths under any prefix registered with
/// [`MemoryFilesystem::with_unwritable`] fail with `PermissionDenied`.
#[derive(Clone, Default)]
pub struct MemoryFilesystem {
    files: Arc<RwLock<BTreeMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<BTreeSet<PathBuf>>>,
    unwritable: Vec<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unwritable(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.unwritable.push(prefix.into());
        self
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().ok()?.get(path).cloned()
    }

    /// Every written path, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.files
            .read()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.unwritable.iter().any(|prefix| path.starts_with(prefix)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        Ok(())
    }
}

fn poisoned() -> io::Error {
    io::Error::other("memory filesystem lock poisoned")
}

#[async_trait]
impl Filesystem for MemoryFilesystem {
    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_writable(path)?;
        let mut dirs = self.dirs.write().map_err(|_| poisoned())?;
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.check_writable(path)?;
        let parent_exists = match path.parent() {
            Some(parent) => self.dirs.read().map_err(|_| poisoned())?.contains(parent),
            None => true,
        };
        if !parent_exists {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no directory for {}", path.display()),
            ));
        }

        self.files
            .write()
            .map_err(|_| poisoned())?
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_requires_directory() {
        let fs = MemoryFilesystem::new();
        let err = fs.write(Path::new("/out/a.txt"), b"a").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        fs.create_dir_all(Path::new("/out")).await.unwrap();
        fs.write(Path::new("/out/a.txt"), b"a").await.unwrap();
        assert_eq!(fs.read(Path::new("/out/a.txt")), Some(b"a".to_vec()));
    }

    #[tokio::test]
    async fn test_unwritable_prefix() {
        let fs = MemoryFilesystem::new().with_unwritable("/ro");
        let err = fs.create_dir_all(Path::new("/ro/sub")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(fs.create_dir_all(Path::new("/rw")).await.is_ok());
    }
}
