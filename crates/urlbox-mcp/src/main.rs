use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use urlbox_core::UrlboxConfig;
use urlbox_mcp::UrlboxMcpServer;
use urlbox_telemetry::init_telemetry;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_telemetry();

    if let Err(e) = run().await {
        eprintln!("urlbox-mcp: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = UrlboxConfig::load()?;
    let server = UrlboxMcpServer::from_config(&config)?;

    info!(endpoint = %config.render_endpoint(), "Urlbox MCP Server running on stdio");

    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
