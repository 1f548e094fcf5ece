//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3500` |
//! | `DATABASE_URL` | `postgres://localhost/technotes` |
//! | `STORAGE_BACKEND` | `postgres` (`memory` keeps notes in process) |
//! | `SEED_USERS` | empty; comma-separated usernames for the memory backend |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` |
//! | `MAX_BODY_BYTES` | `65536` |
//! | `LOG_FORMAT` | `text` |
//! | `LOG_FILE` | unset (stdout) |
//! | `LOG_ANSI` | auto |
//!
//! Unparseable values fall back to the default. Each fallback is kept in
//! [`ServerConfig::fallbacks`] and reported by [`ServerConfig::log_fallbacks`]
//! once logging is up.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use technotes_core::logging::LogFormat;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3500;
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/technotes";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {0}")]
    BindAddr(String),
}

/// Which store backs the note operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Logging options consumed by the binary's subscriber setup.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub file: Option<String>,
    pub ansi: Option<bool>,
}

/// A variable whose value could not be parsed, so its default was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFallback {
    pub key: &'static str,
    pub value: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub storage: StorageBackend,
    pub seed_users: Vec<String>,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub logging: LoggingConfig,
    /// Values rejected while reading the environment.
    pub fallbacks: Vec<ConfigFallback>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage: StorageBackend::default(),
            seed_users: Vec::new(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_acquire_timeout_secs: DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
            allowed_origins: split_list(DEFAULT_ALLOWED_ORIGINS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            logging: LoggingConfig::default(),
            fallbacks: Vec::new(),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or<T, F>(
    lookup: &F,
    fallbacks: &mut Vec<ConfigFallback>,
    key: &'static str,
    default: T,
) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                fallbacks.push(ConfigFallback {
                    key,
                    value: raw,
                    error: e.to_string(),
                });
                default
            }
        },
        None => default,
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut fallbacks = Vec::new();

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) if !split_list(&raw).is_empty() => split_list(&raw),
            _ => defaults.allowed_origins,
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, &mut fallbacks, "PORT", defaults.port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            storage: parse_or(&lookup, &mut fallbacks, "STORAGE_BACKEND", defaults.storage),
            seed_users: lookup("SEED_USERS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            db_max_connections: parse_or(
                &lookup,
                &mut fallbacks,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            ),
            db_acquire_timeout_secs: parse_or(
                &lookup,
                &mut fallbacks,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.db_acquire_timeout_secs,
            ),
            allowed_origins,
            max_body_bytes: parse_or(
                &lookup,
                &mut fallbacks,
                "MAX_BODY_BYTES",
                defaults.max_body_bytes,
            ),
            logging: LoggingConfig {
                format: parse_or(&lookup, &mut fallbacks, "LOG_FORMAT", LogFormat::Text),
                file: lookup("LOG_FILE").filter(|s| !s.trim().is_empty()),
                ansi: lookup("LOG_ANSI")
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| v == "true" || v == "1"),
            },
            fallbacks,
        }
    }

    /// Warn about every value that was replaced by its default.
    pub fn log_fallbacks(&self) {
        for fallback in &self.fallbacks {
            warn!(
                key = fallback.key,
                value = %fallback.value,
                error = %fallback.error,
                "Invalid configuration value, using default"
            );
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::BindAddr(addr))
    }
}
