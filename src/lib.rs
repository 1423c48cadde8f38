//! A small polling site: published questions, a voting form per question and
//! a results page.
//!
//! Questions and choices are created administratively; visitors only read them
//! and add votes. Storage is PostgreSQL when `DATABASE_URL` is set, otherwise
//! an in-memory store that starts empty.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum_server::Handle;
use tokio::signal::{self, ctrl_c};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod poll;
pub mod routes;
pub mod store;
pub mod views;

use config::Config;
use error::StartupError;
use store::{create_pool, MemoryStore, PgStore, PollStore};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

pub async fn start_server() -> Result<(), StartupError> {
    let config = Config::load()?;

    match config.database_url.as_deref() {
        Some(database_url) => {
            info!("Connecting to the database...");
            let pool = create_pool(database_url, config.max_connections).await?;
            let store = PgStore::new(pool);

            info!("Running migrations...");
            store.migrate().await?;

            serve(store, &config).await
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store");
            serve(MemoryStore::new(), &config).await
        }
    }
}

async fn serve<S: PollStore>(store: S, config: &Config) -> Result<(), StartupError> {
    let app = routes::create_routes(Arc::new(store), &config.mount);

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let mount = if config.mount.is_empty() { "/" } else { config.mount.as_str() };
    info!("Server running on {address}, mounted at {mount}");

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    axum_server::bind(address)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
