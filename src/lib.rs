mod commands;
mod config;
mod data;
mod error;
mod models;
pub(crate) mod scope_path;
mod server;
mod services;
mod state;
mod templates;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use data::migrations;
use tracing::info;

pub use config::Config;
pub use error::AppError;
pub use services::search_service::{CannedSearcher, FdSearcher, FileSearcher};
pub use state::AppState;

fn init_db(db_path: &Path) -> Result<rusqlite::Connection, AppError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = rusqlite::Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Loads the config, opens the favorites store and serves until the
/// listener fails. Every startup failure is returned rather than retried.
pub async fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    if !config.root().is_dir() {
        bail!("root path {} is not a directory", config.root().display());
    }

    let conn = init_db(&config.database.path).with_context(|| {
        format!(
            "failed to open favorites store at {}",
            config.database.path.display()
        )
    })?;

    let searcher = Arc::new(FdSearcher::new(
        config.search.command.clone(),
        config.search.timeout(),
    ));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("serving {} at http://{addr}", config.root().display());

    let state = Arc::new(AppState::new(config, conn, searcher));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, server::router(state)).await?;
    Ok(())
}
