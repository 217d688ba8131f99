use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    MissingFields(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Username already exists")]
    DuplicateUsername,

    // Same text for unknown user and wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(format!("Migration failed: {}", err))
    }
}

impl AppError {
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::MissingFields(_)
            | AppError::PasswordMismatch
            | AppError::PasswordTooShort
            | AppError::DuplicateUsername
            | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::Crypto(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Server faults are logged, not echoed.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Session(_) => "Error while logging out".to_string(),
            AppError::Database(_)
            | AppError::Crypto(_)
            | AppError::Config(_)
            | AppError::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

// Axum IntoResponse implementation for HTTP errors
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        }

        let body = serde_json::json!({
            "success": false,
            "message": self.client_message(),
        });

        (status, axum::Json(body)).into_response()
    }
}
