//! Synchronous render submission.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlbox_core::{Error, RenderOptions, RenderResult, Result, TransportError, UrlboxConfig};

/// Submits validated render options to the Urlbox API.
///
/// One instance is shared for the life of the server. Every call makes
/// exactly one request; failures are reported, never retried.
#[derive(Debug, Clone)]
pub struct RenderClient {
    endpoint: String,
    secret: String,
    client: reqwest::Client,
}

impl RenderClient {
    /// Create a client from the process configuration
    pub fn new(config: &UrlboxConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("urlbox-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::config_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.render_endpoint(),
            secret: config.secret.clone(),
            client,
        })
    }

    /// POST the options to the sync endpoint and decode whatever comes back.
    ///
    /// A JSON body is decoded regardless of HTTP status, so error payloads on
    /// 4xx/5xx responses surface as [`RenderResult::Failed`].
    #[instrument(skip(self, options), fields(source = options.source_label()))]
    pub async fn render(
        &self,
        options: &RenderOptions,
    ) -> std::result::Result<RenderResult, TransportError> {
        let body = options.request_body();

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.secret))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        debug!("Response status: {}", status);

        let bytes = response.bytes().await.map_err(|e| self.request_error(e))?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(status = status.as_u16(), "Render endpoint returned a non-JSON body");
            TransportError::InvalidBody {
                status: status.as_u16(),
                message: e.to_string(),
            }
        })?;

        RenderResult::from_value(status.as_u16(), value)
    }

    fn request_error(&self, e: reqwest::Error) -> TransportError {
        let message = if e.is_timeout() {
            "request timed out".to_string()
        } else {
            e.without_url().to_string()
        };
        warn!(endpoint = %self.endpoint, error = %message, "Render request failed");
        TransportError::Request {
            url: self.endpoint.clone(),
            message,
        }
    }
}
