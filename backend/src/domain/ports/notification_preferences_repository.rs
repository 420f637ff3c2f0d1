//! Driven port for notification preference rows.
//!
//! Rows are created lazily. [`NotificationPreferencesRepository::insert_if_absent`]
//! must be race-safe: two concurrent first reads converge on the same stored
//! row.

use async_trait::async_trait;

use crate::domain::{NotificationPreferences, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification preference adapters.
    pub enum NotificationPreferencesRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification preferences connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification preferences query failed: {message}",
    }
}

/// Storage for per-user notification toggles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPreferencesRepository: Send + Sync {
    /// Stored preferences, if any.
    async fn find(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreferences>, NotificationPreferencesRepositoryError>;

    /// Store `defaults` unless a row already exists, then return the stored
    /// row.
    async fn insert_if_absent(
        &self,
        defaults: &NotificationPreferences,
    ) -> Result<NotificationPreferences, NotificationPreferencesRepositoryError>;

    /// Insert or overwrite the user's row.
    async fn save(
        &self,
        preferences: &NotificationPreferences,
    ) -> Result<(), NotificationPreferencesRepositoryError>;
}

/// Repository that never remembers anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationPreferencesRepository;

#[async_trait]
impl NotificationPreferencesRepository for FixtureNotificationPreferencesRepository {
    async fn find(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<NotificationPreferences>, NotificationPreferencesRepositoryError> {
        Ok(None)
    }

    async fn insert_if_absent(
        &self,
        defaults: &NotificationPreferences,
    ) -> Result<NotificationPreferences, NotificationPreferencesRepositoryError> {
        Ok(defaults.clone())
    }

    async fn save(
        &self,
        _preferences: &NotificationPreferences,
    ) -> Result<(), NotificationPreferencesRepositoryError> {
        Ok(())
    }
}
