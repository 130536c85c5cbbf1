use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stockroom_api::config::{LogFormat, ServerConfig};
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "stockroom_api=debug,stockroom_db=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env());

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        log_format = ?config.log_format,
        "Loaded server configuration"
    );

    let pool = prepare_database(&config).await;

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight requests have finished; release connections before exiting.
    let close_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(close_timeout, pool.close()).await.is_err() {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Timed out waiting for database connections to close"
        );
    }
    tracing::info!("Shutdown complete");
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Connect, check, migrate, and provision the first administrator if asked to.
///
/// Any failure here aborts startup.
async fn prepare_database(config: &ServerConfig) -> DbPool {
    let pool = stockroom_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    stockroom_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    stockroom_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!(
        max_connections = config.db_max_connections,
        "Database ready, migrations applied"
    );

    if let Some(admin) = &config.bootstrap_admin {
        let created = stockroom_api::bootstrap::ensure_admin(&pool, admin)
            .await
            .expect("Failed to create bootstrap administrator");
        if !created {
            tracing::debug!("Users already exist, skipping bootstrap administrator");
        }
    }

    pool
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Starting graceful shutdown");
}
