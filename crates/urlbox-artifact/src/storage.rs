//! Ordered fallback over candidate output directories

use crate::StorageError;
use crate::filesystem::LocalFilesystem;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Name of the output directory created under each base location.
pub const DIR_NAME: &str = "urlbox-renders";

/// The two filesystem operations storage needs.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all missing parents.
    async fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

    /// Create or replace a file.
    async fn write(&self, path: &Path, contents: &[u8]) -> std::io::Result<()>;
}

/// `~/Downloads`, `~/Desktop`, `~` and the temp dir, each joined with
/// [`DIR_NAME`]. Home-relative entries are omitted when there is no home.
pub fn default_output_dirs() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("Downloads").join(DIR_NAME));
        candidates.push(home.join("Desktop").join(DIR_NAME));
        candidates.push(home.join(DIR_NAME));
    }
    candidates.push(std::env::temp_dir().join(DIR_NAME));
    candidates
}

/// Save `contents` as `file_name` in the first candidate directory that can
/// be created and written to.
///
/// Each failed candidate is logged and skipped. Returns `None` when every
/// candidate failed.
pub async fn write_first_available(
    fs: &dyn Filesystem,
    candidates: &[PathBuf],
    file_name: &str,
    contents: &[u8],
) -> Option<PathBuf> {
    for dir in candidates {
        match try_write(fs, dir, file_name, contents).await {
            Ok(path) => {
                debug!(path = %path.display(), bytes = contents.len(), "Stored artifact");
                return Some(path);
            }
            Err(e) => warn!("Skipping output directory: {}", e),
        }
    }

    error!(
        file_name,
        candidates = candidates.len(),
        "No output directory was writable"
    );
    None
}

async fn try_write(
    fs: &dyn Filesystem,
    dir: &Path,
    file_name: &str,
    contents: &[u8],
) -> Result<PathBuf, StorageError> {
    fs.create_dir_all(dir)
        .await
        .map_err(|source| StorageError::CreateDir {
            dir: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(file_name);
    fs.write(&path, contents)
        .await
        .map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

/// A filesystem paired with its candidate directories.
#[derive(Clone)]
pub struct StorageWriter {
    fs: Arc<dyn Filesystem>,
    candidates: Vec<PathBuf>,
}

impl StorageWriter {
    pub fn new(fs: Arc<dyn Filesystem>, candidates: Vec<PathBuf>) -> Self {
        Self { fs, candidates }
    }

    /// Local disk, falling back to [`default_output_dirs`] when `configured` is empty.
    pub fn local(configured: Vec<PathBuf>) -> Self {
        let candidates = if configured.is_empty() {
            default_output_dirs()
        } else {
            configured
        };
        Self::new(Arc::new(LocalFilesystem), candidates)
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub async fn store(&self, file_name: &str, contents: &[u8]) -> Option<PathBuf> {
        write_first_available(self.fs.as_ref(), &self.candidates, file_name, contents).await
    }
}

impl std::fmt::Debug for StorageWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageWriter")
            .field("candidates", &self.candidates)
            .finish_non_exhaustive()
    }
}
