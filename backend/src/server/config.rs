//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use arrienda_backend::config::DEFAULT_SCHEMA_CACHE_TTL_SECS;
use arrienda_backend::outbound::persistence::DbPool;

/// Everything [`create_server`](super::create_server) needs, assembled by
/// `main` from settings and the session environment.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) schema_cache_ttl: Duration,
    pub(crate) unread_rpc: bool,
    pub(crate) fixture_login: bool,
}

impl ServerConfig {
    /// Configuration running on fixtures with the default schema cache.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            schema_cache_ttl: Duration::from_secs(DEFAULT_SCHEMA_CACHE_TTL_SECS),
            unread_rpc: false,
            fixture_login: false,
        }
    }

    /// Use PostgreSQL adapters instead of fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_schema_cache_ttl(mut self, ttl: Duration) -> Self {
        self.schema_cache_ttl = ttl;
        self
    }

    /// Try the `get_unread_messages_count` RPC before the table strategies.
    #[must_use]
    pub fn with_unread_rpc(mut self, enabled: bool) -> Self {
        self.unread_rpc = enabled;
        self
    }

    /// Keep the development login when a database is configured. Ignored in
    /// release builds.
    #[must_use]
    pub fn with_fixture_login(mut self, enabled: bool) -> Self {
        self.fixture_login = enabled;
        self
    }
}
