//! Driving port for reading a user's notifications.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Error, Notification, NotificationListQuery, NotificationPreferences, UserId};

/// Read-side notification use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsQuery: Send + Sync {
    /// Newest-first page of the user's notifications.
    async fn list(
        &self,
        user_id: &UserId,
        query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, Error>;

    /// Unread notification count; zero when storage is unreadable.
    async fn count_unread(&self, user_id: &UserId) -> u64;

    /// Stored preferences, created with defaults on first access.
    async fn preferences(&self, user_id: &UserId) -> Result<NotificationPreferences, Error>;
}

/// Empty inbox with default preferences.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationsQuery;

#[async_trait]
impl NotificationsQuery for FixtureNotificationsQuery {
    async fn list(
        &self,
        _user_id: &UserId,
        _query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, Error> {
        Ok(Vec::new())
    }

    async fn count_unread(&self, _user_id: &UserId) -> u64 {
        0
    }

    async fn preferences(&self, user_id: &UserId) -> Result<NotificationPreferences, Error> {
        Ok(NotificationPreferences::new_default(user_id.clone(), Utc::now()))
    }
}
