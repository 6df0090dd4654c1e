//! MCP server for Urlbox renders
//!
//! Exposes a single `render` tool over stdio. A call validates its options,
//! submits them to the synchronous render endpoint, optionally saves every
//! rendered file locally and answers with one block of text.

pub mod format;
pub mod pipeline;
pub mod server;

// Re-exports
pub use pipeline::{RenderOutcome, RenderPipeline, ToolReply};
pub use server::{RenderArguments, SERVER_NAME, UrlboxMcpServer};
