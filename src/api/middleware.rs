use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::state::AppState;
use crate::db::SessionRepository;
use crate::error::AppError;

/// Identity bound to a live session
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
}

/// Resolve the session cookie to an identity.
///
/// A missing cookie, an unknown token and an expired session all yield
/// `Ok(None)`; only storage faults are errors.
pub async fn resolve_session(
    state: &AppState,
    jar: &CookieJar,
) -> Result<Option<Identity>, AppError> {
    let Some(cookie) = jar.get(&state.config.session_cookie_name) else {
        return Ok(None);
    };

    let session = SessionRepository::get_by_token(&state.db, cookie.value()).await?;

    Ok(session.map(|s| Identity {
        user_id: s.user_id,
        username: s.username,
    }))
}

/// Gate for protected pages - redirects anonymous requests to the entry page
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match resolve_session(&state, &jar).await? {
        Some(identity) => {
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        None => Ok(Redirect::to("/").into_response()),
    }
}
