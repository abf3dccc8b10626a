//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Only `MONGODB_URI` is required, and
//! only when the MongoDB backend is selected.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Which [`crate::persistence::RecordStore`] implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// External MongoDB deployment reached through `MONGODB_URI`.
    Mongo,
    /// Process-local store; records vanish on restart.
    Memory,
}

impl StorageBackend {
    /// Name as accepted by `STORAGE_BACKEND`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mongo => "mongodb",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Configuration(format!(
                "unknown STORAGE_BACKEND {other:?}; expected \"mongodb\" or \"memory\""
            ))),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// MongoDB connection string. `None` when the variable is unset.
    pub uri: Option<String>,
    /// Database holding the `events` and `bookings` collections.
    pub database: String,
    /// Upper bound on a single connection attempt.
    pub connect_timeout: Duration,
    /// Extra attempts after a transient failure.
    pub connect_retries: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub retry_backoff: Duration,
}

impl DatabaseConfig {
    /// Returns the connection URI.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when `MONGODB_URI` was not set.
    pub fn require_uri(&self) -> Result<&str, AppError> {
        self.uri.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "please define the MONGODB_URI environment variable".to_string(),
            )
        })
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: "eventbook".to_string(),
            connect_timeout: Duration::from_secs(10),
            connect_retries: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Selected storage backend.
    pub storage: StorageBackend,

    /// Database connection settings.
    pub database: DatabaseConfig,

    /// Per-request timeout applied by the HTTP layer.
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults for everything except `MONGODB_URI`, whose
    /// absence is reported when the connection is first needed.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if `LISTEN_ADDR` or
    /// `STORAGE_BACKEND` is set but cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| AppError::Configuration(format!("invalid LISTEN_ADDR: {e}")))?;

        let storage = match std::env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Mongo,
        };

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            uri: std::env::var("MONGODB_URI")
                .ok()
                .filter(|uri| !uri.trim().is_empty()),
            database: std::env::var("MONGODB_DATABASE").unwrap_or(defaults.database),
            connect_timeout: Duration::from_secs(parse_env(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
            connect_retries: parse_env("MONGODB_CONNECT_RETRIES", defaults.connect_retries),
            retry_backoff: Duration::from_millis(parse_env("MONGODB_RETRY_BACKOFF_MS", 200)),
        };

        let request_timeout = Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 30));

        Ok(Self {
            listen_addr,
            storage,
            database,
            request_timeout,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
