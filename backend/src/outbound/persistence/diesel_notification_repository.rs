//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.
//!
//! Channels and metadata are stored as JSON text for compatibility with rows
//! written by the web application, which may add notification types before
//! this service learns them. Listings skip rows that no longer parse and log
//! each one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::unread::clamp_count;
use crate::domain::{
    Notification, NotificationChannel, NotificationId, NotificationListQuery, NotificationType,
    UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::DbPool;
use super::schema::notifications;

/// Diesel-backed notification inbox.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: super::pool::PoolError) -> NotificationRepositoryError {
    map_pool_error(error, NotificationRepositoryError::connection)
}

fn map_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationRepositoryError> {
    let kind = row
        .kind
        .parse::<NotificationType>()
        .map_err(|err| NotificationRepositoryError::corrupt(err.to_string()))?;
    let channels = serde_json::from_str::<Vec<NotificationChannel>>(&row.channels)
        .map_err(|err| NotificationRepositoryError::corrupt(format!("channels: {err}")))?;
    let metadata = row
        .metadata
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|err| NotificationRepositoryError::corrupt(format!("metadata: {err}")))?;

    Ok(Notification {
        id: NotificationId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        kind,
        title: row.title,
        message: row.message,
        channels,
        metadata,
        related_id: row.related_id,
        related_type: row.related_type,
        read: row.read,
        read_at: row.read_at,
        created_at: row.created_at,
    })
}

fn notification_to_row(
    notification: &Notification,
) -> Result<NewNotificationRow<'_>, NotificationRepositoryError> {
    let channels = serde_json::to_string(&notification.channels)
        .map_err(|err| NotificationRepositoryError::query(format!("channels: {err}")))?;
    let metadata = notification
        .metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|err| NotificationRepositoryError::query(format!("metadata: {err}")))?;

    Ok(NewNotificationRow {
        id: *notification.id.as_uuid(),
        user_id: *notification.user_id.as_uuid(),
        kind: notification.kind.as_str(),
        title: &notification.title,
        message: &notification.message,
        channels,
        metadata,
        related_id: notification.related_id.as_deref(),
        related_type: notification.related_type.as_deref(),
        read: notification.read,
        read_at: notification.read_at,
        created_at: notification.created_at,
    })
}

fn readable_notifications(rows: Vec<NotificationRow>) -> Vec<Notification> {
    let total = rows.len();
    let notifications: Vec<Notification> = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id;
            row_to_notification(row)
                .inspect_err(|error| warn!(%id, %error, "skipping unreadable notification"))
                .ok()
        })
        .collect();

    let skipped = total - notifications.len();
    if skipped > 0 {
        warn!(skipped, total, "notification listing skipped unreadable rows");
    }
    notifications
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn list(
        &self,
        user_id: &UserId,
        query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut statement = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .select(NotificationRow::as_select())
            .into_boxed();
        if query.unread_only() {
            statement = statement.filter(notifications::read.eq(false));
        }

        let rows: Vec<NotificationRow> = statement
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(i64::from(query.limit()))
            .offset(i64::from(query.offset()))
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(readable_notifications(rows))
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let count: i64 = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .filter(notifications::read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(clamp_count(count))
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
        read_at: DateTime<Utc>,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let owned = notifications::table
            .filter(notifications::id.eq(id.as_uuid()))
            .filter(notifications::user_id.eq(user_id.as_uuid()));

        // Only unread rows are touched so the first read timestamp survives.
        let updated = diesel::update(owned.clone().filter(notifications::read.eq(false)))
            .set((
                notifications::read.eq(true),
                notifications::read_at.eq(Some(read_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        if updated > 0 {
            return Ok(true);
        }

        diesel::select(diesel::dsl::exists(owned))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_error)
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let updated = diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id.as_uuid()))
                .filter(notifications::read.eq(false)),
        )
        .set((
            notifications::read.eq(true),
            notifications::read_at.eq(Some(read_at)),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_error)?;

        Ok(u64::try_from(updated).unwrap_or(u64::MAX))
    }

    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let row = notification_to_row(notification)?;
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use uuid::Uuid;

    #[fixture]
    fn row() -> NotificationRow {
        NotificationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: "NEW_MESSAGE".to_owned(),
            title: "Nuevo mensaje".to_owned(),
            message: "Tenés un mensaje nuevo".to_owned(),
            channels: r#"["in_app","email"]"#.to_owned(),
            metadata: Some(r#"{"conversationId":"c-1"}"#.to_owned()),
            related_id: Some("c-1".to_owned()),
            related_type: Some("message".to_owned()),
            read: false,
            read_at: None,
            created_at: Utc
                .with_ymd_and_hms(2026, 2, 1, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[rstest]
    fn rows_convert_to_notifications(row: NotificationRow) {
        let expected_id = row.id;
        let notification = row_to_notification(row).expect("valid row");

        assert_eq!(notification.id.as_uuid(), &expected_id);
        assert_eq!(notification.kind, NotificationType::NewMessage);
        assert_eq!(
            notification.channels,
            vec![NotificationChannel::InApp, NotificationChannel::Email]
        );
        assert_eq!(notification.metadata, Some(json!({ "conversationId": "c-1" })));
    }

    #[rstest]
    #[case::unknown_type("kind", "NEW_SMOKE_SIGNAL")]
    #[case::unknown_channel("channels", r#"["pigeon"]"#)]
    #[case::bad_channel_json("channels", "in_app,email")]
    #[case::bad_metadata("metadata", "{not json")]
    fn malformed_rows_are_corrupt(
        mut row: NotificationRow,
        #[case] field: &str,
        #[case] value: &str,
    ) {
        match field {
            "kind" => row.kind = value.to_owned(),
            "channels" => row.channels = value.to_owned(),
            "metadata" => row.metadata = Some(value.to_owned()),
            other => panic!("unexpected field {other}"),
        }

        let err = row_to_notification(row).expect_err("row should be rejected");
        assert!(matches!(err, NotificationRepositoryError::Corrupt { .. }));
    }

    #[rstest]
    fn notifications_round_trip_through_rows(row: NotificationRow) {
        let notification = row_to_notification(row).expect("valid row");
        let new_row = notification_to_row(&notification).expect("serialisable");

        assert_eq!(new_row.kind, "NEW_MESSAGE");
        assert_eq!(new_row.channels, r#"["in_app","email"]"#);
        assert_eq!(new_row.metadata.as_deref(), Some(r#"{"conversationId":"c-1"}"#));
        assert_eq!(new_row.related_type, Some("message"));
    }

    #[rstest]
    fn listings_skip_rows_with_unknown_types(row: NotificationRow) {
        let readable = row.clone();
        let mut newer_type = row;
        newer_type.id = Uuid::new_v4();
        newer_type.kind = "PROPERTY_VIEWED".to_owned();
        let mut bad_channels = readable.clone();
        bad_channels.id = Uuid::new_v4();
        bad_channels.channels = r#"["pigeon"]"#.to_owned();

        let listed = readable_notifications(vec![newer_type, readable.clone(), bad_channels]);

        assert_eq!(listed.len(), 1);
        assert_eq!(listed.as_slice().first().map(|n| *n.id.as_uuid()), Some(readable.id));
    }
}
