#![forbid(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use namebook_core::db::open_db;
use namebook_core::init_logging;
use namebook_server::{build_router, AppState, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_config()).context("logging init failed")?;

    let db_path = config.resolved_db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    let app = build_router(AppState::new(conn));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        "event=server_start module=server status=ok bind={} db_path={}",
        config.bind,
        db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server loop failed")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=signal_listen module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
