//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, service wiring, and the Axum server lifecycle.

use crate::application::services::ShortLinkService;
use crate::config::Config;
use crate::domain::repositories::UrlStore;
use crate::infrastructure::persistence::{InMemoryUrlStore, PgUrlStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::key_generator::RandomKeyGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool described by `config` and applies migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_database(database_url: &str, config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(pool)
}

/// Builds the store selected by `config`.
///
/// PostgreSQL when a database URL is configured, in-memory otherwise.
///
/// # Errors
///
/// Returns an error if the database is configured but unreachable.
pub async fn build_store(config: &Config) -> Result<Arc<dyn UrlStore>> {
    match config.database_url {
        Some(ref database_url) => {
            let pool = connect_database(database_url, config).await?;
            Ok(Arc::new(PgUrlStore::new(Arc::new(pool))))
        }
        None => {
            tracing::warn!("No database configured, using in-memory store");
            Ok(Arc::new(InMemoryUrlStore::new()))
        }
    }
}

/// Wires the short link service over `store`.
pub fn build_link_service(store: Arc<dyn UrlStore>, config: &Config) -> Arc<ShortLinkService> {
    Arc::new(ShortLinkService::new(
        store,
        Arc::new(RandomKeyGenerator::new()),
        config.key_max_attempts,
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Store (PostgreSQL with migrations, or in-memory)
/// - Short link service
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;
    let link_service = build_link_service(store, &config);

    let state = AppState::new(link_service, config.public_base_url.clone());

    let app = app_router(state, config.request_timeout_secs);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutting down...");
}
