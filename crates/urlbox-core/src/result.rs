//! Render result model
//!
//! The render endpoint answers with either a success payload carrying
//! `renderUrl` or an error payload carrying an `error` object. Both are
//! decoded here; anything else is a transport problem.

use crate::error::TransportError;
use crate::options::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// A generated thumbnail of the primary render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
}

/// Thumbnails arrive either as a list or keyed by name. Anything else is
/// kept as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Thumbnails {
    List(Vec<Thumbnail>),
    Keyed(BTreeMap<String, Thumbnail>),
    Raw(Value),
}

/// Successful render.
///
/// Only `renderUrl` is required. Fields that are shown but never acted on
/// keep whatever JSON the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOk {
    pub render_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mhtml_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Thumbnails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(
        rename = "custom_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certified_hash: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_options: Option<Value>,
    /// Fields the model does not know about, kept for display.
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl RenderOk {
    pub fn new(render_url: impl Into<String>) -> Self {
        Self {
            render_url: render_url.into(),
            size: None,
            render_time: None,
            queue_time: None,
            bandwidth: None,
            html_url: None,
            markdown_url: None,
            metadata_url: None,
            mhtml_url: None,
            thumbnails: None,
            metadata: None,
            custom_id: None,
            llm: None,
            timestamp: None,
            certified_hash: None,
            hashed_options: None,
            extra: JsonObject::new(),
        }
    }

    /// Top-level fields as received, known ones first.
    pub fn fields(&self) -> JsonObject {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => JsonObject::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Error payload returned by the render service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFailure {
    pub error: RemoteError,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Outcome reported by the render service.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    Ok(Box<RenderOk>),
    Failed(RenderFailure),
}

impl RenderResult {
    /// Decode a JSON body received with HTTP `status`.
    ///
    /// The status is only used for error messages; an error payload on a
    /// 200 and a success payload on a 4xx are both taken at face value.
    pub fn from_value(status: u16, value: Value) -> Result<Self, TransportError> {
        let is_failure = value
            .as_object()
            .is_some_and(|map| map.contains_key("error"));

        if is_failure {
            serde_json::from_value::<RenderFailure>(value)
                .map(RenderResult::Failed)
                .map_err(|e| TransportError::UnexpectedShape {
                    status,
                    message: format!("malformed error payload: {e}"),
                })
        } else {
            serde_json::from_value::<RenderOk>(value)
                .map(|ok| RenderResult::Ok(Box::new(ok)))
                .map_err(|e| TransportError::UnexpectedShape {
                    status,
                    message: e.to_string(),
                })
        }
    }

}
