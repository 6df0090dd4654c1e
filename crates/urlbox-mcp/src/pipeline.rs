//! Validate, submit, store, format

use crate::format::{format_outcome, format_validation};
use std::time::Instant;
use tracing::{Instrument, Span, info, warn};
use urlbox_artifact::{ArtifactFetcher, StoredFile};
use urlbox_client::RenderClient;
use urlbox_core::{
    JsonObject, RenderFailure, RenderOk, RenderOptions, RenderResult, Result, TransportError,
    UrlboxConfig,
};
use urlbox_telemetry::{
    RenderOutcomeKind, new_invocation_id, record_render_outcome, record_render_request, render_span,
};

/// Result of one render invocation once options were valid.
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    Rendered {
        result: Box<RenderOk>,
        stored: Vec<StoredFile>,
    },
    Failed(RenderFailure),
    Unreachable(TransportError),
}

impl RenderOutcome {
    pub fn is_error(&self) -> bool {
        !matches!(self, RenderOutcome::Rendered { .. })
    }

    fn kind(&self) -> RenderOutcomeKind {
        match self {
            RenderOutcome::Rendered { .. } => RenderOutcomeKind::Rendered,
            RenderOutcome::Failed(_) => RenderOutcomeKind::Failed,
            RenderOutcome::Unreachable(_) => RenderOutcomeKind::Unreachable,
        }
    }

    fn stored_count(&self) -> usize {
        match self {
            RenderOutcome::Rendered { stored, .. } => stored.len(),
            _ => 0,
        }
    }
}

/// Text handed back to the MCP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
}

/// One `render` tool call from raw arguments to reply text.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    client: RenderClient,
    fetcher: ArtifactFetcher,
}

impl RenderPipeline {
    pub fn new(client: RenderClient, fetcher: ArtifactFetcher) -> Self {
        Self { client, fetcher }
    }

    /// Pipeline talking to the configured endpoint and writing to local disk.
    pub fn from_config(config: &UrlboxConfig) -> Result<Self> {
        Ok(Self::new(
            RenderClient::new(config)?,
            ArtifactFetcher::new(config)?,
        ))
    }

    /// Handle one invocation inside its own `render` span.
    ///
    /// Invalid options never reach the network; failed or unreachable
    /// renders never touch the filesystem.
    pub async fn run(&self, arguments: JsonObject) -> ToolReply {
        let span = render_span(&new_invocation_id());
        self.invoke(arguments, &span).instrument(span.clone()).await
    }

    async fn invoke(&self, arguments: JsonObject, span: &Span) -> ToolReply {
        let started = Instant::now();

        let options = match RenderOptions::from_arguments(arguments) {
            Ok(options) => options,
            Err(e) => {
                warn!(violations = e.violations().len(), "Rejected render options");
                record_render_outcome(span, RenderOutcomeKind::Invalid, 0, elapsed_ms(started));
                return ToolReply {
                    text: format_validation(&e),
                    is_error: true,
                };
            }
        };

        let format = options.output_format().as_str();
        record_render_request(span, options.source_label(), format);
        info!(
            source = options.source_label(),
            format,
            store_renders = options.stores_renders(),
            "Rendering"
        );

        let outcome = self.render(&options).await;
        record_render_outcome(
            span,
            outcome.kind(),
            outcome.stored_count(),
            elapsed_ms(started),
        );

        ToolReply {
            text: format_outcome(&outcome),
            is_error: outcome.is_error(),
        }
    }

    /// Submit validated options and store artifacts when asked to.
    pub async fn render(&self, options: &RenderOptions) -> RenderOutcome {
        match self.client.render(options).await {
            Ok(RenderResult::Ok(result)) => {
                let stored = if options.stores_renders() {
                    self.fetcher.store_all(&result, options).await
                } else {
                    Vec::new()
                };
                RenderOutcome::Rendered { result, stored }
            }
            Ok(RenderResult::Failed(failure)) => {
                warn!(
                    message = %failure.error.message,
                    request_id = failure.request_id.as_deref().unwrap_or("-"),
                    "Render failed remotely"
                );
                RenderOutcome::Failed(failure)
            }
            Err(e) => RenderOutcome::Unreachable(e),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
