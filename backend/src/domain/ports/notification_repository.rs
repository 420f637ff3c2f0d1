//! Driven port for notification storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Notification, NotificationId, NotificationListQuery, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
        /// A stored row could not be mapped back into the domain.
        Corrupt { message: String } =>
            "notification row is malformed: {message}",
    }
}

/// Persistence for a user's notification inbox.
///
/// Every operation is scoped to the owning user; rows belonging to anyone
/// else are invisible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Newest-first page of notifications.
    async fn list(
        &self,
        user_id: &UserId,
        query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Number of unread notifications.
    async fn count_unread(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError>;

    /// Mark one notification read.
    ///
    /// The first read timestamp is kept when the row is already read. Returns
    /// `false` when no notification with `id` belongs to the user.
    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
        read_at: DateTime<Utc>,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Mark every unread notification read and return how many changed.
    async fn mark_all_read(
        &self,
        user_id: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError>;

    /// Store a new notification.
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;
}

/// Repository that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn list(
        &self,
        _user_id: &UserId,
        _query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(Vec::new())
    }

    async fn count_unread(&self, _user_id: &UserId) -> Result<u64, NotificationRepositoryError> {
        Ok(0)
    }

    async fn mark_read(
        &self,
        _user_id: &UserId,
        _id: &NotificationId,
        _read_at: DateTime<Utc>,
    ) -> Result<bool, NotificationRepositoryError> {
        Ok(false)
    }

    async fn mark_all_read(
        &self,
        _user_id: &UserId,
        _read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        Ok(0)
    }

    async fn insert(
        &self,
        _notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }
}
