//! Concurrent download of render artifacts

use crate::naming::{artifact_file_name, render_stamp};
use crate::storage::StorageWriter;
use crate::{ArtifactBody, ArtifactReference, FetchError, StoredFile};
use chrono::Utc;
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use urlbox_core::{Error, RenderOk, RenderOptions, Result, UrlboxConfig};

/// Downloads every artifact of a successful render and stores it locally.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    client: reqwest::Client,
    writer: StorageWriter,
}

impl ArtifactFetcher {
    /// Fetcher writing to the configured (or default) local directories.
    pub fn new(config: &UrlboxConfig) -> Result<Self> {
        Self::with_writer(config, StorageWriter::local(config.output_dirs.clone()))
    }

    pub fn with_writer(config: &UrlboxConfig, writer: StorageWriter) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| Error::config_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, writer })
    }

    /// Download and store every artifact of `result`.
    ///
    /// Downloads run concurrently and are all awaited. Artifacts that fail to
    /// download or store are logged and left out; the rest keep their
    /// candidate order.
    #[instrument(skip_all, fields(render_url = %result.render_url))]
    pub async fn store_all(&self, result: &RenderOk, options: &RenderOptions) -> Vec<StoredFile> {
        let references = ArtifactReference::collect(result, options.output_format());
        let stamp = render_stamp(Utc::now());
        let host = options.source_host();

        let stored: Vec<StoredFile> = join_all(
            references
                .iter()
                .map(|reference| self.fetch_and_store(reference, host.as_deref(), &stamp)),
        )
        .await
        .into_iter()
        .flatten()
        .collect();

        info!(
            candidates = references.len(),
            stored = stored.len(),
            "Stored render artifacts"
        );
        stored
    }

    async fn fetch_and_store(
        &self,
        reference: &ArtifactReference,
        host: Option<&str>,
        stamp: &str,
    ) -> Option<StoredFile> {
        let body = match self.fetch(reference).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Skipping artifact: {}", e);
                return None;
            }
        };

        let file_name = artifact_file_name(host, stamp, &reference.extension);
        let path = self.writer.store(&file_name, body.as_bytes()).await?;

        Some(StoredFile {
            label: reference.label(),
            path,
        })
    }

    /// GET one artifact, as text or bytes depending on its kind.
    pub async fn fetch(
        &self,
        reference: &ArtifactReference,
    ) -> std::result::Result<ArtifactBody, FetchError> {
        debug!("Fetching artifact: {}", reference.url);

        let request_error = |e: reqwest::Error| FetchError::Request {
            url: reference.url.clone(),
            message: e.without_url().to_string(),
        };

        let response = self
            .client
            .get(&reference.url)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: reference.url.clone(),
                status: status.as_u16(),
            });
        }

        if reference.is_text() {
            let text = response.text().await.map_err(request_error)?;
            Ok(ArtifactBody::Text(text))
        } else {
            let bytes = response.bytes().await.map_err(request_error)?;
            Ok(ArtifactBody::Binary(bytes.to_vec()))
        }
    }
}
