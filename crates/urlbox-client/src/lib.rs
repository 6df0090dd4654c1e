//! HTTP client for the Urlbox synchronous render endpoint.

pub mod client;

pub use client::RenderClient;
