use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StoreBackend};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{
    customer::{CustomerRepository, CustomerService},
    storage::{build_store, KvStore},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration from `config.toml`, falling back to env vars.
pub fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "config file unusable; falling back to environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
    }
}

/// Wire the directory service onto an already opened store.
pub fn build_app(store: Arc<dyn KvStore>, cfg: &AppConfig) -> Router {
    let repo = CustomerRepository::new(store, cfg.store.roster_key.clone());
    let customers = CustomerService::new(repo).with_serialized_writes(cfg.store.serialize_writes);
    let state = AppState { customers: Arc::new(customers) };
    routes::build_router(state, build_cors())
}

/// Open the store, serve until Ctrl+C, then release the store handle.
pub async fn run_with(cfg: AppConfig) -> Result<(), StartupError> {
    if cfg.store.backend == StoreBackend::File {
        common::env::ensure_parent_dir(&cfg.store.file_path).await?;
    }
    let store = build_store(&cfg.store).await?;
    let app = build_app(store, &cfg);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    info!(%addr, backend = ?cfg.store.backend, roster_key = %cfg.store.roster_key, "starting customer roster server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind {addr}: {e}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)?;

    // The router (and with it the last store handle) is dropped by now.
    info!("server stopped; store handle released");
    Ok(())
}

/// Public entry: load config, build the app and run the HTTP server.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    let cfg = load_config()?;
    run_with(cfg).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
