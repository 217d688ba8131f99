use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::api::middleware::resolve_session;
use crate::api::payload::Payload;
use crate::api::state::AppState;
use crate::config::Config;
use crate::crypto::{hash_password_blocking, verify_password_blocking};
use crate::db::{SessionRepository, UserRepository};
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_repeat: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Registration checks, in order; the first failure wins.
pub fn validate_registration(req: RegisterRequest) -> Result<Credentials, AppError> {
    let (Some(username), Some(password), Some(password_repeat)) = (
        non_empty(req.username),
        non_empty(req.password),
        non_empty(req.password_repeat),
    ) else {
        return Err(AppError::MissingFields("All fields are required"));
    };

    if password != password_repeat {
        return Err(AppError::PasswordMismatch);
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::PasswordTooShort);
    }

    Ok(Credentials { username, password })
}

pub fn validate_login(req: LoginRequest) -> Result<Credentials, AppError> {
    match (non_empty(req.username), non_empty(req.password)) {
        (Some(username), Some(password)) => Ok(Credentials { username, password }),
        _ => Err(AppError::MissingFields("Username and password are required")),
    }
}

fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((config.session_cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.session_cookie_secure)
        .build()
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Payload(req): Payload<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let Credentials { username, password } = validate_registration(req)?;

    if UserRepository::exists(&state.db, &username).await? {
        return Err(AppError::DuplicateUsername);
    }

    let password_hash = hash_password_blocking(password).await?;

    // The UNIQUE constraint still rejects a concurrent registration that got past the lookup
    let user = UserRepository::create(&state.db, &username, &password_hash).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "👤 User registered");

    Ok(Json(RegisterResponse {
        success: true,
        message: "Account created successfully".to_string(),
        user_id: user.id,
    }))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Payload(req): Payload<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let Credentials { username, password } = validate_login(req)?;

    let Some(user) = UserRepository::get_by_username(&state.db, &username).await? else {
        tracing::warn!(%username, "Login failed");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        tracing::warn!(%username, "Login failed");
        return Err(AppError::InvalidCredentials);
    }

    // Never reuse a token presented before authentication. A failed delete
    // aborts the login so the old token cannot outlive it.
    if let Some(previous) = jar.get(&state.config.session_cookie_name) {
        SessionRepository::delete(&state.db, previous.value()).await?;
    }

    let session = SessionRepository::create(
        &state.db,
        &user.id,
        &user.username,
        state.config.session_expiry_hours,
    ).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "🔑 User logged in");

    let jar = jar.add(session_cookie(&state.config, session.token));

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            username: user.username,
        }),
    ))
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let name = state.config.session_cookie_name.clone();
    let token = jar.get(&name).map(|c| c.value().to_string());

    if let Some(token) = token {
        let removed = SessionRepository::delete(&state.db, &token)
            .await
            .map_err(|e| AppError::Session(e.to_string()))?;

        if removed {
            tracing::info!("👋 Session destroyed");
        }
    }

    let jar = jar.remove(Cookie::build((name, "")).path("/"));

    Ok((
        jar,
        Json(MessageResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        }),
    ))
}

/// GET /check-auth
pub async fn check_auth(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AuthStatus>, AppError> {
    let status = match resolve_session(&state, &jar).await? {
        Some(identity) => AuthStatus {
            authenticated: true,
            username: Some(identity.username),
        },
        None => AuthStatus {
            authenticated: false,
            username: None,
        },
    };

    Ok(Json(status))
}
