pub mod auth;
pub mod middleware;
pub mod pages;
pub mod payload;
pub mod state;

pub use state::AppState;
pub use middleware::Identity;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::{
    services::ServeDir,
    trace::TraceLayer,
    timeout::TimeoutLayer,
};
use std::time::Duration;
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let assets = ServeDir::new(&state.config.public_dir);

    Router::new()
        // Pages
        .route("/", get(pages::index))
        .route(
            "/dashboard",
            get(pages::dashboard).route_layer(axum_middleware::from_fn_with_state(
                state.clone(),
                middleware::require_session,
            )),
        )

        // Health check
        .route("/health", get(health))

        // Authentication endpoints
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/check-auth", get(auth::check_auth))

        // Static assets (main.js, style.css)
        .fallback_service(assets)

        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
