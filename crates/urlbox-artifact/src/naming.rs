//! Local file names for stored artifacts

use chrono::{DateTime, Utc};
use urlbox_core::HTML_SOURCE_PLACEHOLDER;

/// Timestamp shared by every artifact of one render, e.g.
/// `2024-05-01T12-30-45-123Z`.
pub fn render_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

/// Extension used on disk; `jpeg` is shortened to `jpg`.
pub fn file_extension(extension: &str) -> &str {
    match extension {
        "jpeg" => "jpg",
        other => other,
    }
}

/// `<host>_<stamp>.<ext>`, with `html-render` standing in for the host when
/// raw HTML was rendered.
pub fn artifact_file_name(host: Option<&str>, stamp: &str, extension: &str) -> String {
    let host = match host {
        Some(host) if !host.is_empty() => sanitize(host),
        _ => HTML_SOURCE_PLACEHOLDER.to_string(),
    };
    format!("{}_{}.{}", host, stamp, file_extension(extension))
}

fn sanitize(host: &str) -> String {
    host.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
