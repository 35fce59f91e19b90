//! # AppConfig
//!
//! Process-level configuration, read once at startup and passed down
//! explicitly. Site-facing settings (page sizes, names) live in
//! `SiteSettings` behind the `SettingsStore` port instead.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to, e.g. "127.0.0.1:8080".
    pub bind_addr: String,
    /// SQLite connection string, e.g. "sqlite:outpost.db".
    pub database_url: String,
    /// Secret used to sign session tokens. Rotating it invalidates
    /// every outstanding session.
    pub session_salt: String,
    /// Optional bootstrap admin account, created at startup if missing.
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the environment, falling back to
    /// development defaults where that is safe.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("OUTPOST_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("OUTPOST_DB_URL")
                .unwrap_or_else(|_| "sqlite:outpost.db".to_string()),
            session_salt: env::var("OUTPOST_SESSION_SALT")
                .unwrap_or_else(|_| "dev-only-salt".to_string()),
            admin_username: env::var("OUTPOST_ADMIN_USER").ok(),
            admin_password: env::var("OUTPOST_ADMIN_PASSWORD").ok(),
        }
    }
}
