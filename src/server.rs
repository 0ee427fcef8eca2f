//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire up the
//! database and the MCP tool handler into a running server.

use crate::tools::TapeTools;
use anyhow::Result;
use attention_tape::config::TapeConfig;
use attention_tape::db;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared setup: open the database and wrap state for sharing.
fn setup_shared_state(config: TapeConfig) -> Result<(Arc<Mutex<rusqlite::Connection>>, Arc<TapeConfig>)> {
    let db_path = config.resolved_db_path();
    let busy_timeout = Duration::from_millis(config.storage.busy_timeout_ms);
    let conn = db::open_database(&db_path, busy_timeout)?;
    tracing::info!(db = %db_path.display(), "database ready");

    Ok((Arc::new(Mutex::new(conn)), Arc::new(config)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: TapeConfig) -> Result<()> {
    tracing::info!("starting attention tape MCP server on stdio");

    let (db, config) = setup_shared_state(config)?;

    let tools = TapeTools::new(db, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running — waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP, mounted at `/mcp`.
pub async fn serve_http(config: TapeConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(addr = %bind_addr, "starting attention tape MCP server on HTTP");

    let (db, config) = setup_shared_state(config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(TapeTools::new(db.clone(), config.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
