//! Span creation helpers for render tool calls

use crate::attributes::*;
use tracing::Span;
use tracing::field::{Empty, display};

/// How a render invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcomeKind {
    /// Options were rejected before any request
    Invalid,
    /// The service produced a render
    Rendered,
    /// The service answered with an error payload
    Failed,
    /// No parsed answer from the service
    Unreachable,
}

impl RenderOutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderOutcomeKind::Invalid => "invalid",
            RenderOutcomeKind::Rendered => "rendered",
            RenderOutcomeKind::Failed => "failed",
            RenderOutcomeKind::Unreachable => "unreachable",
        }
    }
}

/// Fresh id correlating the logs of one invocation.
pub fn new_invocation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Open the `render` span for one tool call.
///
/// The span should wrap the whole invocation. Request and outcome attributes
/// start empty and are filled with [`record_render_request`] and
/// [`record_render_outcome`] before the span closes.
pub fn render_span(invocation_id: &str) -> Span {
    tracing::info_span!(
        "render",
        { TOOL_NAME } = "render",
        { URLBOX_INVOCATION_ID } = %invocation_id,
        { URLBOX_RENDER_SOURCE } = Empty,
        { URLBOX_RENDER_FORMAT } = Empty,
        { URLBOX_RENDER_OUTCOME } = Empty,
        { URLBOX_STORED_FILES } = Empty,
        { URLBOX_DURATION_MS } = Empty,
    )
}

/// Record what is being rendered once the options are known.
pub fn record_render_request(span: &Span, source: &str, format: &str) {
    span.record(URLBOX_RENDER_SOURCE, display(source));
    span.record(URLBOX_RENDER_FORMAT, format);
}

/// Record how the invocation ended.
pub fn record_render_outcome(
    span: &Span,
    outcome: RenderOutcomeKind,
    stored_files: usize,
    duration_ms: u64,
) {
    span.record(URLBOX_RENDER_OUTCOME, outcome.as_str());
    span.record(URLBOX_STORED_FILES, stored_files as u64);
    span.record(URLBOX_DURATION_MS, duration_ms);
}
