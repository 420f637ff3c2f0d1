//! Diesel-backed `PropertyUnreadRepository` for the property conversation
//! layouts.
//!
//! The tables belong to the property application and differ between
//! deployments, so counts run as raw SQL with bound parameters. Each layout is
//! a single aggregate over messages joined to their conversation; participant
//! columns are compared as text because older deployments store them as
//! `text` and newer ones as `uuid`.

use async_trait::async_trait;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PropertyUnreadRepository, PropertyUnreadRepositoryError};
use crate::domain::{LegacyLayout, ProfileId, UserId};

use super::diesel_error_mapping::{is_missing_relation, map_diesel_error, map_pool_error};
use super::models::{CountRow, ProfileIdRow};
use super::pool::DbPool;

const PROFILE_ID_SQL: &str = concat!(
    "SELECT id::text AS id FROM \"UserProfile\" ",
    "WHERE \"userId\"::text = $1 LIMIT 1",
);

const PASCAL_LEGACY_UNREAD_SQL: &str = concat!(
    "SELECT COUNT(*)::bigint AS count ",
    "FROM \"Message\" m ",
    "JOIN \"Conversation\" c ON c.id = m.\"conversationId\" ",
    "WHERE c.\"isActive\" = true ",
    "AND (c.\"aId\"::text = $1 OR c.\"bId\"::text = $1) ",
    "AND m.\"senderId\"::text <> $1 ",
    "AND m.\"isRead\" = false",
);

const SNAKE_LEGACY_UNREAD_SQL: &str = concat!(
    "SELECT COUNT(*)::bigint AS count ",
    "FROM messages m ",
    "JOIN conversations c ON c.id = m.conversation_id ",
    "WHERE c.is_active = true ",
    "AND (c.a_id::text = $1 OR c.b_id::text = $1) ",
    "AND m.sender_id::text <> $1 ",
    "AND m.is_read = false",
);

const MODERN_UNREAD_SQL: &str = concat!(
    "SELECT COUNT(*)::bigint AS count ",
    "FROM messages m ",
    "JOIN conversations c ON c.id = m.conversation_id ",
    "WHERE (c.sender_id::text = $1 OR c.receiver_id::text = $1) ",
    "AND m.sender_id::text <> $1 ",
    "AND m.is_read = false",
);

/// Unread counts for property conversations.
#[derive(Clone)]
pub struct DieselPropertyUnreadRepository {
    pool: DbPool,
}

impl DieselPropertyUnreadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn count(
        &self,
        sql: &'static str,
        participant: String,
    ) -> Result<i64, PropertyUnreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PropertyUnreadRepositoryError::connection))?;

        diesel::sql_query(sql)
            .bind::<Text, _>(participant)
            .get_result::<CountRow>(&mut conn)
            .await
            .map(|row| row.count)
            .map_err(map_error)
    }
}

fn map_error(error: diesel::result::Error) -> PropertyUnreadRepositoryError {
    map_diesel_error(
        error,
        PropertyUnreadRepositoryError::query,
        PropertyUnreadRepositoryError::connection,
    )
}

fn legacy_unread_sql(layout: LegacyLayout) -> &'static str {
    match layout {
        LegacyLayout::PascalCase => PASCAL_LEGACY_UNREAD_SQL,
        LegacyLayout::SnakeCase => SNAKE_LEGACY_UNREAD_SQL,
    }
}

#[async_trait]
impl PropertyUnreadRepository for DieselPropertyUnreadRepository {
    async fn find_profile_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProfileId>, PropertyUnreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PropertyUnreadRepositoryError::connection))?;

        let result = diesel::sql_query(PROFILE_ID_SQL)
            .bind::<Text, _>(user_id.to_string())
            .load::<ProfileIdRow>(&mut conn)
            .await;

        let rows = match result {
            Ok(rows) => rows,
            Err(err) if is_missing_relation(&err) => return Ok(None),
            Err(err) => return Err(map_error(err)),
        };

        // A blank id cannot own conversations.
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| ProfileId::new(row.id).ok()))
    }

    async fn count_legacy_unread(
        &self,
        profile_id: &ProfileId,
        layout: LegacyLayout,
    ) -> Result<i64, PropertyUnreadRepositoryError> {
        self.count(legacy_unread_sql(layout), profile_id.to_string()).await
    }

    async fn count_modern_unread(
        &self,
        user_id: &UserId,
    ) -> Result<i64, PropertyUnreadRepositoryError> {
        self.count(MODERN_UNREAD_SQL, user_id.to_string()).await
    }
}
