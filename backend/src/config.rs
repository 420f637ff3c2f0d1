//! Process settings loaded via OrthoConfig.
//!
//! Values come from `ARRIENDA_*` environment variables, an optional config
//! file and command-line flags, in OrthoConfig's usual precedence. Session
//! cookie toggles are read separately by
//! [`session_config`](crate::inbound::http::session_config).

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
/// Default lifetime of cached conversation table shapes, in seconds.
pub const DEFAULT_SCHEMA_CACHE_TTL_SECS: u64 = 30;

/// Settings controlling the HTTP listener and persistence.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ARRIENDA")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without one the server runs on in-memory fixtures.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// How long detected conversation tables are trusted. `0` disables the
    /// cache.
    pub schema_cache_ttl_secs: Option<u64>,
    /// Keep the `admin`/`password` development login when a database is
    /// configured. Debug builds only.
    pub fixture_login: Option<bool>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    pub fn fixture_login(&self) -> bool {
        self.fixture_login.unwrap_or(false)
    }

    pub fn schema_cache_ttl(&self) -> Duration {
        Duration::from_secs(
            self.schema_cache_ttl_secs
                .unwrap_or(DEFAULT_SCHEMA_CACHE_TTL_SECS),
        )
    }
}
