//! Diesel row structs for the owned tables.
//!
//! Rows stay inside the persistence layer; repositories convert them to and
//! from domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Text};
use uuid::Uuid;

use super::schema::{notification_preferences, notifications};

/// Row read from `notifications`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub channels: String,
    pub metadata: Option<String>,
    pub related_id: Option<String>,
    pub related_type: Option<String>,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insertable notification.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub channels: String,
    pub metadata: Option<String>,
    pub related_id: Option<&'a str>,
    pub related_type: Option<&'a str>,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Full `notification_preferences` row, used for reads and upserts alike.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = notification_preferences)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationPreferencesRow {
    pub user_id: Uuid,
    pub email_enabled: bool,
    pub in_app_enabled: bool,
    pub push_enabled: bool,
    pub new_messages: bool,
    pub message_replies: bool,
    pub property_inquiries: bool,
    pub property_status_change: bool,
    pub property_expiring: bool,
    pub favorites_updates: bool,
    pub new_properties_in_area: bool,
    pub likes_received: bool,
    pub new_followers: bool,
    pub payment_completed: bool,
    pub plan_expiring: bool,
    pub invoice_ready: bool,
    pub system_announcements: bool,
    pub security_alerts: bool,
    pub promotional_emails: bool,
    pub newsletter: bool,
    pub updated_at: DateTime<Utc>,
}

/// Single `count` column returned by raw count queries.
#[derive(Debug, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// Single `present` column returned by raw existence checks.
#[derive(Debug, QueryableByName)]
pub(crate) struct PresenceRow {
    #[diesel(sql_type = Bool)]
    pub present: bool,
}

/// Single `column_name` column from `information_schema.columns`.
#[derive(Debug, QueryableByName)]
pub(crate) struct ColumnNameRow {
    #[diesel(sql_type = Text)]
    pub column_name: String,
}

/// Single `id` column holding a legacy profile identifier.
#[derive(Debug, QueryableByName)]
pub(crate) struct ProfileIdRow {
    #[diesel(sql_type = Text)]
    pub id: String,
}
