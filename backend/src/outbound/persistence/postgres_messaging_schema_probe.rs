//! PostgreSQL-backed `MessagingSchemaProbe`.
//!
//! Column lists come from `information_schema.columns`, which answers for
//! tables that do not exist without raising an error. The profile probe reads
//! `"UserProfile"` directly; deployments without the legacy schema report
//! `false` instead of failing.

use async_trait::async_trait;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::UserId;
use crate::domain::ports::{MessagingSchemaProbe, MessagingSchemaProbeError};

use super::diesel_error_mapping::{is_missing_relation, map_diesel_error, map_pool_error};
use super::models::{ColumnNameRow, PresenceRow};
use super::pool::DbPool;

const TABLE_COLUMNS_SQL: &str = concat!(
    "SELECT column_name::text AS column_name ",
    "FROM information_schema.columns ",
    "WHERE table_schema = 'public' AND table_name = $1 ",
    "ORDER BY ordinal_position",
);

const USER_PROFILE_SQL: &str = concat!(
    "SELECT EXISTS (",
    "SELECT 1 FROM \"UserProfile\" WHERE \"userId\"::text = $1",
    ") AS present",
);

/// Schema probe over a pooled Diesel connection.
#[derive(Clone)]
pub struct PostgresMessagingSchemaProbe {
    pool: DbPool,
}

impl PostgresMessagingSchemaProbe {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> MessagingSchemaProbeError {
    map_diesel_error(
        error,
        MessagingSchemaProbeError::query,
        MessagingSchemaProbeError::connection,
    )
}

/// An empty column list means the table is absent.
fn columns_or_none(rows: Vec<ColumnNameRow>) -> Option<Vec<String>> {
    if rows.is_empty() {
        None
    } else {
        Some(rows.into_iter().map(|row| row.column_name).collect())
    }
}

#[async_trait]
impl MessagingSchemaProbe for PostgresMessagingSchemaProbe {
    async fn has_user_profile(&self, user_id: &UserId) -> Result<bool, MessagingSchemaProbeError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MessagingSchemaProbeError::connection))?;

        let result = diesel::sql_query(USER_PROFILE_SQL)
            .bind::<Text, _>(user_id.to_string())
            .get_result::<PresenceRow>(&mut conn)
            .await;

        match result {
            Ok(row) => Ok(row.present),
            Err(err) if is_missing_relation(&err) => {
                debug!("UserProfile table absent");
                Ok(false)
            }
            Err(err) => Err(map_error(err)),
        }
    }

    async fn table_columns(
        &self,
        table: &str,
    ) -> Result<Option<Vec<String>>, MessagingSchemaProbeError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MessagingSchemaProbeError::connection))?;

        let rows = diesel::sql_query(TABLE_COLUMNS_SQL)
            .bind::<Text, _>(table)
            .load::<ColumnNameRow>(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(columns_or_none(rows))
    }
}
