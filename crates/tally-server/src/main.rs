//! # Tally Server
//!
//! Main entry point: loads configuration, prepares the database and serves
//! the REST API until Ctrl-C or SIGTERM.

use anyhow::Context;
use std::sync::Arc;
use tally_config::ConfigLoader;
use tally_core::telemetry::{init_tracing, LogFormat};
use tally_repository::{DatabasePool, DatabasePoolInterface};
use tally_rest::create_router_from_module;
use shaku::HasComponent;
use tally_server::{di, startup};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::from_default_location()
        .context("Failed to load configuration")?
        .get()
        .await;

    init_tracing(
        Some(&config.observability.log_level),
        LogFormat::from_name(&config.observability.log_format),
    )?;

    startup::print_banner();
    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let db_pool = DatabasePool::new(&config.database)
        .await
        .context("Failed to connect to the database")?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let module = di::build_module(&db_pool, &config.security);
    let router = create_router_from_module(module.as_ref(), &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    startup::print_startup_info(&addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(startup::shutdown_signal())
        .await
        .context("REST server error")?;

    let pool: Arc<dyn DatabasePoolInterface> = module.resolve();
    pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}
