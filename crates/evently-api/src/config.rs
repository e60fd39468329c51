//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3001` |
//! | `DATABASE_URL` | unset |
//! | `STORE_BACKEND` | `postgres` when `DATABASE_URL` is set, else `memory` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `CORS_ORIGIN` | `http://localhost:3000` (comma-separated list) |
//! | `SIMILAR_CANDIDATE_MULTIPLIER` | `2` |

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use evently_core::defaults;
use evently_core::{Error, Result};

/// Where events are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!(
                "STORE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub store_backend: StoreBackend,
    pub db_max_connections: u32,
    /// Raw comma-separated origin list.
    pub cors_origin: String,
    pub similar_candidate_multiplier: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            database_url: None,
            store_backend: StoreBackend::Memory,
            db_max_connections: defaults::DB_MAX_CONNECTIONS,
            cors_origin: defaults::CORS_ORIGIN.to_string(),
            similar_candidate_multiplier: defaults::SIMILAR_CANDIDATE_MULTIPLIER,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let base = Self::default();

        let database_url = get("DATABASE_URL");
        let store_backend = match get("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None if database_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "DATABASE_URL is required when STORE_BACKEND=postgres".to_string(),
            ));
        }

        let port = parse_var(&get, "PORT", base.port)?;
        let db_max_connections = parse_var(&get, "DB_MAX_CONNECTIONS", base.db_max_connections)?;
        if db_max_connections == 0 {
            return Err(Error::Config(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        let similar_candidate_multiplier = parse_var(
            &get,
            "SIMILAR_CANDIDATE_MULTIPLIER",
            base.similar_candidate_multiplier,
        )?;
        if similar_candidate_multiplier < 1 {
            return Err(Error::Config(
                "SIMILAR_CANDIDATE_MULTIPLIER must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host: get("HOST").unwrap_or(base.host),
            port,
            database_url,
            store_backend,
            db_max_connections,
            cors_origin: get("CORS_ORIGIN").unwrap_or(base.cors_origin),
            similar_candidate_multiplier,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid HOST/PORT: {}", e)))
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} is invalid ('{}'): {}", key, raw, e))),
        None => Ok(default),
    }
}
