use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session_auth::{
    api::{create_router, AppState},
    config::Config,
    db::{self, SessionRepository},
    error::AppError,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,session_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting session-auth server v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Arc::new(Config::from_env()?);
    tracing::info!("✅ Configuration loaded");

    let pool = db::connect(&config).await?;
    tracing::info!("✅ Database connected: {}", config.database_url);

    db::run_migrations(&pool).await?;
    tracing::info!("✅ Database migrations completed");

    let state = AppState {
        db: pool.clone(),
        config: config.clone(),
    };

    // Spawn background task for session cleanup
    let cleanup = {
        let db_clone = pool.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(3600)); // Every hour
            loop {
                interval.tick().await;
                match SessionRepository::cleanup_expired(&db_clone).await {
                    Ok(removed) => tracing::debug!("🧹 {} expired sessions cleaned up", removed),
                    Err(e) => tracing::error!("❌ Session cleanup failed: {}", e),
                }
            }
        })
    };
    tracing::info!("✅ Session cleanup task started (runs hourly)");

    let app = create_router(state);

    let addr = config.server_address();
    tracing::info!("🌐 Server listening on http://{}", addr);
    tracing::info!("");
    tracing::info!("📚 Endpoints:");
    tracing::info!("  GET  /            - Entry page");
    tracing::info!("  GET  /dashboard   - Dashboard (requires session)");
    tracing::info!("  POST /register    - Register new user");
    tracing::info!("  POST /login       - Login with username and password");
    tracing::info!("  POST /logout      - Destroy current session");
    tracing::info!("  GET  /check-auth  - Session status");
    tracing::info!("");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    cleanup.abort();
    pool.close().await;
    tracing::info!("✅ Database closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("❌ Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("❌ Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("🛑 Shutdown signal received");
}
