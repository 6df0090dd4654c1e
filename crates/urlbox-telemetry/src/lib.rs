//! # Urlbox Telemetry
//!
//! OpenTelemetry integration and structured logging for the render server.
//!
//! Logs go to stderr: stdout carries the MCP protocol and must stay clean.
//! Each tool invocation is recorded as one `render` span with the attributes
//! in [`attributes`].

mod spans;
mod tracer;

pub use spans::{
    RenderOutcomeKind, new_invocation_id, record_render_outcome, record_render_request, render_span,
};
pub use tracer::{init_telemetry, register_span_processor, tracer_provider};

/// OpenTelemetry span attribute names.
pub mod attributes {
    pub const TOOL_NAME: &str = "mcp.tool.name";

    pub const URLBOX_INVOCATION_ID: &str = "urlbox.invocation_id";
    pub const URLBOX_RENDER_SOURCE: &str = "urlbox.render.source";
    pub const URLBOX_RENDER_FORMAT: &str = "urlbox.render.format";
    pub const URLBOX_RENDER_OUTCOME: &str = "urlbox.render.outcome";
    pub const URLBOX_STORED_FILES: &str = "urlbox.render.stored_files";
    pub const URLBOX_DURATION_MS: &str = "urlbox.render.duration_ms";

    // Instrumentation scope
    pub const SYSTEM_NAME: &str = "urlbox";
}
