//! End-to-end tests of the render tool against a mock Urlbox API.

mod common;

use common::{OutputDirs, arguments, pipeline};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_pdf_render_is_stored_in_fallback_directory() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let render = server
        .mock("POST", "/v1/render/sync")
        .match_header("authorization", "Bearer test-secret")
        .match_body(Matcher::Json(json!({
            "url": "https://example.com",
            "format": "pdf",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "renderUrl": format!("{}/x.pdf", server.url()),
                "size": "1.2MB",
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let download = server
        .mock("GET", "/x.pdf")
        .with_status(200)
        .with_body(b"%PDF-1.7 test")
        .expect(1)
        .create_async()
        .await;

    let dirs = OutputDirs::with_blocked_primary()?;
    let reply = pipeline(server.url(), &dirs)?
        .run(arguments(json!({
            "url": "https://example.com",
            "format": "pdf",
            "store_renders": true,
        })))
        .await;

    render.assert_async().await;
    download.assert_async().await;

    assert!(!reply.is_error, "unexpected error: {}", reply.text);
    assert!(
        reply
            .text
            .contains(&format!("renderUrl: {}/x.pdf", server.url()))
    );
    assert!(reply.text.contains("size: 1.2MB"));

    let written = dirs.written_files();
    assert_eq!(written.len(), 1);
    let path = &written[0];
    assert_eq!(path.parent(), Some(dirs.fallback.as_path()));

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("example.com_"));
    assert!(name.ends_with(".pdf"));
    assert_eq!(std::fs::read(path)?, b"%PDF-1.7 test");

    let pdf_line = format!("PDF: {}", path.display());
    assert_eq!(reply.text.lines().last(), Some(pdf_line.as_str()));
    Ok(())
}

#[tokio::test]
async fn test_side_renders_are_stored_in_order() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _render = server
        .mock("POST", "/v1/render/sync")
        .with_status(200)
        .with_body(
            json!({
                "renderUrl": format!("{}/shot.png", server.url()),
                "size": "88KB",
                "htmlUrl": format!("{}/page.html", server.url()),
                "markdownUrl": format!("{}/page.md", server.url()),
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _png = server
        .mock("GET", "/shot.png")
        .with_status(200)
        .with_body(b"\x89PNG")
        .create_async()
        .await;
    let _html = server
        .mock("GET", "/page.html")
        .with_status(200)
        .with_body("<html><body>hi</body></html>")
        .create_async()
        .await;
    let _markdown = server
        .mock("GET", "/page.md")
        .with_status(500)
        .create_async()
        .await;

    let dirs = OutputDirs::with_blocked_primary()?;
    let reply = pipeline(server.url(), &dirs)?
        .run(arguments(json!({
            "url": "https://example.com/pricing",
            "save_html": true,
            "save_markdown": true,
            "store_renders": true,
        })))
        .await;

    assert!(!reply.is_error);
    let stored: Vec<&str> = reply
        .text
        .lines()
        .filter(|line| line.starts_with("PNG: ") || line.starts_with("HTML: "))
        .collect();
    assert_eq!(stored.len(), 2);
    assert!(stored[0].starts_with("PNG: "));
    assert!(stored[1].starts_with("HTML: "));
    assert!(!reply.text.contains("MD: "));
    assert_eq!(dirs.written_files().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_remote_failure_reports_request_id_without_downloads() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _render = server
        .mock("POST", "/v1/render/sync")
        .with_status(401)
        .with_body(
            json!({
                "error": {"message": "Invalid API key", "code": "Unauthorized"},
                "requestId": "0c7e-91ab",
            })
            .to_string(),
        )
        .create_async()
        .await;
    let downloads = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dirs = OutputDirs::with_blocked_primary()?;
    let reply = pipeline(server.url(), &dirs)?
        .run(arguments(json!({
            "url": "https://example.com",
            "store_renders": true,
        })))
        .await;

    downloads.assert_async().await;
    assert!(reply.is_error);
    assert!(reply.text.contains("Invalid API key"));
    assert!(reply.text.contains("Request ID: 0c7e-91ab"));
    assert!(dirs.written_files().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_nothing_is_written_unless_requested() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _render = server
        .mock("POST", "/v1/render/sync")
        .with_status(200)
        .with_body(
            json!({
                "renderUrl": format!("{}/x.png", server.url()),
                "htmlUrl": format!("{}/x.html", server.url()),
                "metadataUrl": format!("{}/x.json", server.url()),
            })
            .to_string(),
        )
        .create_async()
        .await;
    let downloads = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dirs = OutputDirs::with_blocked_primary()?;
    let pipeline = pipeline(server.url(), &dirs)?;

    for args in [
        json!({"url": "https://example.com", "save_html": true}),
        json!({"url": "https://example.com", "store_renders": false}),
    ] {
        let reply = pipeline.run(arguments(args)).await;
        assert!(!reply.is_error);
        assert!(!reply.text.contains("PNG: "));
    }

    downloads.assert_async().await;
    assert!(dirs.written_files().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_url_never_reaches_the_network() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let render = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dirs = OutputDirs::with_blocked_primary()?;
    let reply = pipeline(server.url(), &dirs)?
        .run(arguments(json!({"url": "not-a-url"})))
        .await;

    render.assert_async().await;
    assert!(reply.is_error);
    assert!(reply.text.starts_with("Invalid render options:"));
    assert!(reply.text.contains("- url: "));
    Ok(())
}
