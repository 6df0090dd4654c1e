//! # Urlbox Artifact Storage
//!
//! Downloads the files produced by a render and saves them to local disk.
//!
//! ## Features
//!
//! - **Concurrent downloads**: every artifact of a render is fetched at once
//! - **Directory fallback**: files land in the first writable output directory
//! - **Pluggable filesystem**: local disk in production, in-memory for tests

use std::path::PathBuf;
use thiserror::Error;
use urlbox_core::{RenderFormat, RenderOk};

mod fetcher;
mod filesystem;
mod memory;
mod naming;
mod storage;

pub use fetcher::ArtifactFetcher;
pub use filesystem::LocalFilesystem;
pub use memory::MemoryFilesystem;
pub use naming::{artifact_file_name, file_extension, render_stamp};
pub use storage::{DIR_NAME, Filesystem, StorageWriter, default_output_dirs, write_first_available};

/// Failure to download one artifact. Recovered by skipping that artifact.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Failure to save into one candidate directory. Recovered by trying the next.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot create directory {dir:?}: {source}")]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloaded artifact contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactBody {
    /// Text formats (html, mhtml, json, md, svg)
    Text(String),
    /// Everything else
    Binary(Vec<u8>),
}

impl ArtifactBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ArtifactBody::Text(text) => text.as_bytes(),
            ArtifactBody::Binary(data) => data,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extensions whose bodies are read as text.
pub const TEXT_EXTENSIONS: [&str; 5] = ["html", "mhtml", "json", "md", "svg"];

/// A downloadable file named by a render result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    pub url: String,
    /// Format extension as requested, before `jpeg` becomes `jpg`
    pub extension: String,
}

impl ArtifactReference {
    pub fn new(url: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extension: extension.into(),
        }
    }

    /// Every downloadable file of a result, primary render first.
    ///
    /// Missing or empty URLs are skipped.
    pub fn collect(result: &RenderOk, format: RenderFormat) -> Vec<ArtifactReference> {
        let candidates = [
            (Some(&result.render_url), format.as_str()),
            (result.html_url.as_ref(), "html"),
            (result.markdown_url.as_ref(), "md"),
            (result.metadata_url.as_ref(), "json"),
            (result.mhtml_url.as_ref(), "mhtml"),
        ];

        candidates
            .into_iter()
            .filter_map(|(url, extension)| match url {
                Some(url) if !url.trim().is_empty() => Some(Self::new(url.as_str(), extension)),
                _ => None,
            })
            .collect()
    }

    pub fn is_text(&self) -> bool {
        TEXT_EXTENSIONS.contains(&self.extension.as_str())
    }

    /// Label shown next to the stored path, e.g. `PDF` or `JPEG`.
    pub fn label(&self) -> String {
        self.extension.to_uppercase()
    }
}

/// An artifact that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub label: String,
    pub path: PathBuf,
}
