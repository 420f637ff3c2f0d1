//! Driving port for notification mutations.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Error, NewNotification, NotificationId, NotificationPreferences,
    NotificationPreferencesPatch, NotifyOutcome, UserId,
};

/// Write-side notification use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsCommand: Send + Sync {
    /// Mark one of the user's notifications read; `not_found` when the id is
    /// unknown or belongs to someone else.
    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<(), Error>;

    /// Mark all of the user's notifications read.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, Error>;

    /// Apply a partial preference update.
    async fn update_preferences(
        &self,
        user_id: &UserId,
        patch: &NotificationPreferencesPatch,
    ) -> Result<NotificationPreferences, Error>;

    /// Deliver a notification subject to the recipient's preferences.
    async fn notify(&self, request: NewNotification) -> Result<NotifyOutcome, Error>;
}

/// Command adapter with nothing behind it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationsCommand;

#[async_trait]
impl NotificationsCommand for FixtureNotificationsCommand {
    async fn mark_read(&self, _user_id: &UserId, _id: &NotificationId) -> Result<(), Error> {
        Err(Error::not_found("notification not found"))
    }

    async fn mark_all_read(&self, _user_id: &UserId) -> Result<u64, Error> {
        Ok(0)
    }

    async fn update_preferences(
        &self,
        user_id: &UserId,
        patch: &NotificationPreferencesPatch,
    ) -> Result<NotificationPreferences, Error> {
        let now = Utc::now();
        Ok(patch.apply(NotificationPreferences::new_default(user_id.clone(), now), now))
    }

    async fn notify(&self, request: NewNotification) -> Result<NotifyOutcome, Error> {
        let prefs = NotificationPreferences::new_default(request.user_id().clone(), Utc::now());
        Ok(match prefs.route(&request) {
            Ok(channels) => NotifyOutcome::Delivered {
                stored: None,
                channels,
            },
            Err(reason) => NotifyOutcome::Skipped(reason),
        })
    }
}
