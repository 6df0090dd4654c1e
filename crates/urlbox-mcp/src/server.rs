//! MCP server exposing the `render` tool.

use crate::pipeline::{RenderPipeline, ToolReply};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use urlbox_core::{JsonObject, RenderOptions, UrlboxConfig};

pub const SERVER_NAME: &str = "urlbox";

/// Raw `render` arguments.
///
/// Kept as a plain object so validation can report every violation instead of
/// stopping at the first one serde trips over. The published schema is the
/// full option schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderArguments(pub JsonObject);

impl JsonSchema for RenderArguments {
    fn schema_name() -> Cow<'static, str> {
        "RenderOptions".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        Schema::from(RenderOptions::input_schema())
    }
}

impl From<ToolReply> for CallToolResult {
    fn from(reply: ToolReply) -> Self {
        let content = vec![Content::text(reply.text)];
        if reply.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

#[derive(Clone)]
pub struct UrlboxMcpServer {
    pipeline: Arc<RenderPipeline>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl UrlboxMcpServer {
    pub fn new(pipeline: RenderPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_config(config: &UrlboxConfig) -> urlbox_core::Result<Self> {
        Ok(Self::new(RenderPipeline::from_config(config)?))
    }

    #[tool(
        name = "render",
        description = "Uses Urlbox.com's POST API for advanced rendering with side renders. Ideal for: use of many options, converting websites to HTML/PDF/markdown, extracting metadata, saving cookies, rendering custom HTML/CSS/JS, and generating multiple output formats simultaneously (html, pdf, md, cookies etc.), while also capturing the main screenshot's format."
    )]
    async fn render(
        &self,
        Parameters(arguments): Parameters<RenderArguments>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self.pipeline.run(arguments.0).await.into())
    }
}

#[tool_handler]
impl ServerHandler for UrlboxMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Urlbox MCP server. Use the `render` tool to screenshot a URL or raw HTML, \
                 convert pages to PDF, HTML, markdown or metadata, and optionally save every \
                 rendered file to local disk with `store_renders`."
                    .into(),
            ),
            ..Default::default()
        }
    }
}
