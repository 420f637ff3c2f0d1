//! PostgreSQL adapters for the messaging read side.
//!
//! Two kinds of tables are involved:
//!
//! - **Owned**: `notifications` and `notification_preferences`, declared in
//!   `schema.rs` and queried through the typed Diesel DSL.
//! - **Foreign**: conversation, message and profile tables owned by the
//!   property and community applications. Their layout differs between
//!   deployments, so they are reached with `sql_query` and bound parameters.
//!
//! Row structs in `models.rs` never leave this module.
//!
//! ```ignore
//! use arrienda_backend::outbound::persistence::{DbPool, DieselNotificationRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/arrienda")).await?;
//! let notifications = DieselNotificationRepository::new(pool.clone());
//! ```

mod diesel_community_unread_sources;
mod diesel_error_mapping;
mod diesel_notification_preferences_repository;
mod diesel_notification_repository;
mod diesel_property_unread_repository;
mod models;
mod pool;
mod postgres_messaging_schema_probe;
mod schema;

pub use diesel_community_unread_sources::{
    CommunityConversationsUnreadSource, RpcCommunityUnreadSource, UserMessagesUnreadSource,
};
pub use diesel_notification_preferences_repository::DieselNotificationPreferencesRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_property_unread_repository::DieselPropertyUnreadRepository;
pub use pool::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
pub use postgres_messaging_schema_probe::PostgresMessagingSchemaProbe;
