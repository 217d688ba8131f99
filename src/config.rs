use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub session_expiry_hours: i64,
    pub session_cookie_name: String,
    pub session_cookie_secure: bool,
    pub public_dir: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            database_url: "sqlite://users.db".to_string(),
            session_expiry_hours: 24,
            session_cookie_name: "sid".to_string(),
            session_cookie_secure: false,
            public_dir: "./public".to_string(),
            db_max_connections: 20,
            db_min_connections: 5,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Config::default();

        Ok(Config {
            server_host: env_or("SERVER_HOST", defaults.server_host),
            server_port: env_parse("SERVER_PORT", defaults.server_port)?,
            database_url: env_or("DATABASE_URL", defaults.database_url),
            session_expiry_hours: env_parse("SESSION_EXPIRY_HOURS", defaults.session_expiry_hours)?,
            session_cookie_name: env_or("SESSION_COOKIE_NAME", defaults.session_cookie_name),
            session_cookie_secure: env_parse("SESSION_COOKIE_SECURE", defaults.session_cookie_secure)?,
            public_dir: env_or("PUBLIC_DIR", defaults.public_dir),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            db_min_connections: env_parse("DB_MIN_CONNECTIONS", defaults.db_min_connections)?,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_address(), "127.0.0.1:3000");
        assert_eq!(config.session_cookie_name, "sid");
        assert!(!config.session_cookie_secure);
    }

    #[test]
    fn test_parse_value() {
        let port: u16 = parse_value("SERVER_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);

        let secure: bool = parse_value("SESSION_COOKIE_SECURE", "true").unwrap();
        assert!(secure);

        let err = parse_value::<u16>("SERVER_PORT", "eighty").unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.starts_with("Invalid SERVER_PORT")));
    }
}
