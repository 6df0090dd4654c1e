//! Common test utilities and helpers

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use urlbox_artifact::{ArtifactFetcher, DIR_NAME, StorageWriter};
use urlbox_client::RenderClient;
use urlbox_core::{JsonObject, UrlboxConfig};
use urlbox_mcp::RenderPipeline;

/// Output directories inside a temp dir. The first candidate sits below a
/// regular file, so it can never be created and every write falls back to
/// the second.
pub struct OutputDirs {
    pub root: TempDir,
    pub blocked: PathBuf,
    pub fallback: PathBuf,
}

impl OutputDirs {
    pub fn with_blocked_primary() -> anyhow::Result<Self> {
        let root = TempDir::new()?;
        let blocker = root.path().join("Downloads");
        std::fs::write(&blocker, b"not a directory")?;

        Ok(Self {
            blocked: blocker.join(DIR_NAME),
            fallback: root.path().join("home").join(DIR_NAME),
            root,
        })
    }

    pub fn candidates(&self) -> Vec<PathBuf> {
        vec![self.blocked.clone(), self.fallback.clone()]
    }

    /// Every file written anywhere below the temp root, excluding the blocker.
    pub fn written_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        collect_files(self.root.path(), &mut files);
        files.retain(|f| f != &self.root.path().join("Downloads"));
        files.sort();
        files
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

/// Pipeline pointed at a mock render endpoint, writing into `dirs`.
pub fn pipeline(base_url: String, dirs: &OutputDirs) -> anyhow::Result<RenderPipeline> {
    let config = UrlboxConfig {
        base_url,
        output_dirs: dirs.candidates(),
        ..UrlboxConfig::test_defaults()
    };
    let writer = StorageWriter::local(config.output_dirs.clone());

    Ok(RenderPipeline::new(
        RenderClient::new(&config)?,
        ArtifactFetcher::with_writer(&config, writer)?,
    ))
}

pub fn arguments(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("arguments must be an object, got {other}"),
    }
}
