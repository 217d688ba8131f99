use axum::{response::Html, Extension};

use crate::api::middleware::Identity;

const INDEX_HTML: &str = include_str!("../../templates/index.html");
const DASHBOARD_HTML: &str = include_str!("../../templates/dashboard.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /dashboard (requires session)
pub async fn dashboard(Extension(identity): Extension<Identity>) -> Html<&'static str> {
    tracing::debug!(user_id = %identity.user_id, username = %identity.username, "Serving dashboard");
    Html(DASHBOARD_HTML)
}
