//! Diesel-backed community unread strategies.
//!
//! Community messaging has shipped three storage shapes over time:
//!
//! | Source                               | Shape                                          |
//! |--------------------------------------|------------------------------------------------|
//! | [`RpcCommunityUnreadSource`]          | `get_unread_messages_count(p_uid uuid)` RPC    |
//! | [`UserMessagesUnreadSource`]          | `user_messages(recipient_id, read_at)`         |
//! | [`CommunityConversationsUnreadSource`]| per-participant counters on conversations      |
//!
//! Each is a separate [`CommunityUnreadSource`] so the aggregator can walk
//! them in order and keep the first one that answers.

use async_trait::async_trait;
use diesel::sql_types::{Text, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{CommunityUnreadSource, CommunityUnreadSourceError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::CountRow;
use super::pool::DbPool;

const RPC_UNREAD_SQL: &str = "SELECT COALESCE(get_unread_messages_count($1), 0)::bigint AS count";

const USER_MESSAGES_UNREAD_SQL: &str = concat!(
    "SELECT COUNT(*)::bigint AS count FROM user_messages ",
    "WHERE recipient_id::text = $1 AND read_at IS NULL",
);

const COMMUNITY_CONVERSATIONS_UNREAD_SQL: &str = concat!(
    "SELECT COALESCE(SUM(CASE ",
    "WHEN user1_id::text = $1 THEN COALESCE(unread_count_user1, 0) ",
    "WHEN user2_id::text = $1 THEN COALESCE(unread_count_user2, 0) ",
    "ELSE 0 END), 0)::bigint AS count ",
    "FROM community_conversations ",
    "WHERE user1_id::text = $1 OR user2_id::text = $1",
);

fn map_error(error: diesel::result::Error) -> CommunityUnreadSourceError {
    map_diesel_error(
        error,
        CommunityUnreadSourceError::query,
        CommunityUnreadSourceError::connection,
    )
}

async fn count_by_text_id(
    pool: &DbPool,
    sql: &'static str,
    user_id: &UserId,
) -> Result<i64, CommunityUnreadSourceError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|err| map_pool_error(err, CommunityUnreadSourceError::connection))?;

    diesel::sql_query(sql)
        .bind::<Text, _>(user_id.to_string())
        .get_result::<CountRow>(&mut conn)
        .await
        .map(|row| row.count)
        .map_err(map_error)
}

/// Counts through the database function deployed with newer community
/// schemas. Only wired in when the RPC feature flag is on.
#[derive(Clone)]
pub struct RpcCommunityUnreadSource {
    pool: DbPool,
}

impl RpcCommunityUnreadSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityUnreadSource for RpcCommunityUnreadSource {
    fn name(&self) -> &'static str {
        "rpc_get_unread_messages_count"
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<i64, CommunityUnreadSourceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CommunityUnreadSourceError::connection))?;

        diesel::sql_query(RPC_UNREAD_SQL)
            .bind::<SqlUuid, _>(*user_id.as_uuid())
            .get_result::<CountRow>(&mut conn)
            .await
            .map(|row| row.count)
            .map_err(map_error)
    }
}

/// Counts direct messages with no read timestamp.
#[derive(Clone)]
pub struct UserMessagesUnreadSource {
    pool: DbPool,
}

impl UserMessagesUnreadSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityUnreadSource for UserMessagesUnreadSource {
    fn name(&self) -> &'static str {
        "user_messages"
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<i64, CommunityUnreadSourceError> {
        count_by_text_id(&self.pool, USER_MESSAGES_UNREAD_SQL, user_id).await
    }
}

/// Sums the user's side of each conversation's unread counters.
#[derive(Clone)]
pub struct CommunityConversationsUnreadSource {
    pool: DbPool,
}

impl CommunityConversationsUnreadSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityUnreadSource for CommunityConversationsUnreadSource {
    fn name(&self) -> &'static str {
        "community_conversations"
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<i64, CommunityUnreadSourceError> {
        count_by_text_id(&self.pool, COMMUNITY_CONVERSATIONS_UNREAD_SQL, user_id).await
    }
}
