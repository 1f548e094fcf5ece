//! technotes-api - HTTP API server for technotes

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use technotes_api::config::{LoggingConfig, ServerConfig, StorageBackend};
use technotes_api::{build_router, AppState};
use technotes_core::logging::{LogFormat, DEFAULT_FILTER};
use technotes_core::MemoryStore;
use technotes_db::{Database, PoolConfig};

/// Install the global subscriber.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = logging.file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("technotes-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match logging.format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(logging.ansi.unwrap_or(false)),
                )
                .init(),
        }
        Some(guard)
    } else {
        match logging.format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer();
                if let Some(ansi) = logging.ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
        }
        None
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGTERM");
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
    info!("Shutdown signal received");
}

async fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    match config.storage {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool_config = PoolConfig::default()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs));
            let db = Database::connect(&config.database_url, &pool_config).await?;
            info!("Database connected");

            info!("Running database migrations...");
            db.migrate().await?;
            info!("Database migrations complete");

            let pool = db.pool().clone();
            Ok(AppState::new(Arc::new(db), config.storage).with_pool(pool))
        }
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            for username in &config.seed_users {
                store.add_user(username).await;
            }
            info!(
                seeded_users = config.seed_users.len(),
                "Using in-memory store; notes are lost on exit"
            );
            Ok(AppState::new(Arc::new(store), config.storage))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    let _file_guard = init_tracing(&config.logging);
    config.log_fallbacks();

    info!(
        log_file = config.logging.file.as_deref().unwrap_or("(stdout)"),
        storage = config.storage.as_str(),
        "Logging initialized"
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
