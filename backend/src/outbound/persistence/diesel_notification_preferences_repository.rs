//! PostgreSQL-backed `NotificationPreferencesRepository` implementation.
//!
//! First reads race: two requests for a new user may both try to create the
//! default row. `insert_if_absent` inserts with `ON CONFLICT DO NOTHING` and
//! then reads back whichever row won.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    NotificationPreferencesRepository, NotificationPreferencesRepositoryError,
};
use crate::domain::{NotificationPreferences, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NotificationPreferencesRow;
use super::pool::{DbPool, PoolError};
use super::schema::notification_preferences;

/// Diesel-backed notification preferences.
#[derive(Clone)]
pub struct DieselNotificationPreferencesRepository {
    pool: DbPool,
}

impl DieselNotificationPreferencesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> NotificationPreferencesRepositoryError {
    map_pool_error(error, NotificationPreferencesRepositoryError::connection)
}

fn map_error(error: diesel::result::Error) -> NotificationPreferencesRepositoryError {
    map_diesel_error(
        error,
        NotificationPreferencesRepositoryError::query,
        NotificationPreferencesRepositoryError::connection,
    )
}

impl From<NotificationPreferencesRow> for NotificationPreferences {
    fn from(row: NotificationPreferencesRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            email_enabled: row.email_enabled,
            in_app_enabled: row.in_app_enabled,
            push_enabled: row.push_enabled,
            new_messages: row.new_messages,
            message_replies: row.message_replies,
            property_inquiries: row.property_inquiries,
            property_status_change: row.property_status_change,
            property_expiring: row.property_expiring,
            favorites_updates: row.favorites_updates,
            new_properties_in_area: row.new_properties_in_area,
            likes_received: row.likes_received,
            new_followers: row.new_followers,
            payment_completed: row.payment_completed,
            plan_expiring: row.plan_expiring,
            invoice_ready: row.invoice_ready,
            system_announcements: row.system_announcements,
            security_alerts: row.security_alerts,
            promotional_emails: row.promotional_emails,
            newsletter: row.newsletter,
            updated_at: row.updated_at,
        }
    }
}

impl From<&NotificationPreferences> for NotificationPreferencesRow {
    fn from(prefs: &NotificationPreferences) -> Self {
        Self {
            user_id: *prefs.user_id.as_uuid(),
            email_enabled: prefs.email_enabled,
            in_app_enabled: prefs.in_app_enabled,
            push_enabled: prefs.push_enabled,
            new_messages: prefs.new_messages,
            message_replies: prefs.message_replies,
            property_inquiries: prefs.property_inquiries,
            property_status_change: prefs.property_status_change,
            property_expiring: prefs.property_expiring,
            favorites_updates: prefs.favorites_updates,
            new_properties_in_area: prefs.new_properties_in_area,
            likes_received: prefs.likes_received,
            new_followers: prefs.new_followers,
            payment_completed: prefs.payment_completed,
            plan_expiring: prefs.plan_expiring,
            invoice_ready: prefs.invoice_ready,
            system_announcements: prefs.system_announcements,
            security_alerts: prefs.security_alerts,
            promotional_emails: prefs.promotional_emails,
            newsletter: prefs.newsletter,
            updated_at: prefs.updated_at,
        }
    }
}

#[async_trait]
impl NotificationPreferencesRepository for DieselNotificationPreferencesRepository {
    async fn find(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreferences>, NotificationPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<NotificationPreferencesRow> = notification_preferences::table
            .filter(notification_preferences::user_id.eq(user_id.as_uuid()))
            .select(NotificationPreferencesRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        Ok(row.map(NotificationPreferences::from))
    }

    async fn insert_if_absent(
        &self,
        defaults: &NotificationPreferences,
    ) -> Result<NotificationPreferences, NotificationPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NotificationPreferencesRow::from(defaults);

        diesel::insert_into(notification_preferences::table)
            .values(&row)
            .on_conflict(notification_preferences::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        let stored: NotificationPreferencesRow = notification_preferences::table
            .filter(notification_preferences::user_id.eq(row.user_id))
            .select(NotificationPreferencesRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(stored.into())
    }

    async fn save(
        &self,
        preferences: &NotificationPreferences,
    ) -> Result<(), NotificationPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NotificationPreferencesRow::from(preferences);

        diesel::insert_into(notification_preferences::table)
            .values(&row)
            .on_conflict(notification_preferences::user_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}
