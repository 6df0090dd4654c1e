//! Core types for the Urlbox render tool
//!
//! This crate holds everything the other crates agree on: the render option
//! schema, the render result model, the error taxonomy and the process
//! configuration.

pub mod config;
pub mod error;
pub mod options;
pub mod result;

// Re-exports
pub use config::UrlboxConfig;
pub use error::{Error, Result, TransportError, ValidationError, Violation};
pub use options::{
    EngineVersion, FullPageMode, HTML_SOURCE_PLACEHOLDER, ImageFit, ImagePosition, JsonObject,
    MediaType, NUMERIC_BOUNDS, NumericBound, OneOrMany, PdfOrientation, PdfPageSize, RenderFormat,
    RenderOptions, ScrollTarget, WaitUntil,
};
pub use result::{RemoteError, RenderFailure, RenderOk, RenderResult, Thumbnail, Thumbnails};
