//! Text rendering of tool results

use crate::pipeline::RenderOutcome;
use serde_json::Value;
use urlbox_artifact::StoredFile;
use urlbox_core::{RenderFailure, RenderOk, TransportError, ValidationError};

/// The single text block returned for an outcome.
pub fn format_outcome(outcome: &RenderOutcome) -> String {
    match outcome {
        RenderOutcome::Rendered { result, stored } => format_rendered(result, stored),
        RenderOutcome::Failed(failure) => format_failure(failure),
        RenderOutcome::Unreachable(error) => format_unreachable(error),
    }
}

/// `key: value` per result field, then `KIND: path` per stored file.
pub fn format_rendered(result: &RenderOk, stored: &[StoredFile]) -> String {
    let fields = result
        .fields()
        .into_iter()
        .map(|(key, value)| format!("{}: {}", key, display_value(&value)));
    let files = stored
        .iter()
        .map(|file| format!("{}: {}", file.label, file.path.display()));

    fields.chain(files).collect::<Vec<_>>().join("\n")
}

pub fn format_failure(failure: &RenderFailure) -> String {
    let mut text = format!("Render failed: {}", failure.error.message);
    if let Some(code) = &failure.error.code {
        text.push_str(&format!(" (code: {code})"));
    }
    if let Some(request_id) = &failure.request_id {
        text.push_str(&format!(" | Request ID: {request_id}"));
    }
    text
}

pub fn format_unreachable(error: &TransportError) -> String {
    format!("Failed to render with error: {error}")
}

pub fn format_validation(error: &ValidationError) -> String {
    error.to_string()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
