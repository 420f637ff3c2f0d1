//! Notification inbox and preference services.
//!
//! [`NotificationService`] implements both notification driving ports on top
//! of the notification and preference repositories. Preference rows are
//! created on first read so every user always has a full set of toggles.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    NotificationPreferencesRepository, NotificationPreferencesRepositoryError,
    NotificationRepository, NotificationRepositoryError, NotificationsCommand,
    NotificationsQuery,
};
use crate::domain::{
    Error, NewNotification, Notification, NotificationChannel, NotificationId,
    NotificationListQuery, NotificationPreferences, NotificationPreferencesPatch, NotifyOutcome,
    UserId,
};

/// Notification service implementing [`NotificationsQuery`] and
/// [`NotificationsCommand`].
pub struct NotificationService<R, P> {
    notifications: Arc<R>,
    preferences: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<R, P> NotificationService<R, P> {
    /// Create a service over the given repositories.
    pub fn new(notifications: Arc<R>, preferences: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            preferences,
            clock,
        }
    }
}

impl<R, P> NotificationService<R, P>
where
    R: NotificationRepository,
    P: NotificationPreferencesRepository,
{
    fn map_notification_error(error: NotificationRepositoryError) -> Error {
        match error {
            NotificationRepositoryError::Connection { message } => Error::service_unavailable(
                format!("notification repository unavailable: {message}"),
            ),
            NotificationRepositoryError::Query { message } => {
                Error::internal(format!("notification repository error: {message}"))
            }
            NotificationRepositoryError::Corrupt { message } => {
                Error::internal(format!("stored notification is malformed: {message}"))
            }
        }
    }

    fn map_preferences_error(error: NotificationPreferencesRepositoryError) -> Error {
        match error {
            NotificationPreferencesRepositoryError::Connection { message } => {
                Error::service_unavailable(format!(
                    "notification preferences unavailable: {message}"
                ))
            }
            NotificationPreferencesRepositoryError::Query { message } => {
                Error::internal(format!("notification preferences error: {message}"))
            }
        }
    }

    async fn load_or_create_preferences(
        &self,
        user_id: &UserId,
    ) -> Result<NotificationPreferences, Error> {
        if let Some(existing) = self
            .preferences
            .find(user_id)
            .await
            .map_err(Self::map_preferences_error)?
        {
            return Ok(existing);
        }

        let defaults = NotificationPreferences::new_default(user_id.clone(), self.clock.utc());
        self.preferences
            .insert_if_absent(&defaults)
            .await
            .map_err(Self::map_preferences_error)
    }

    async fn store_in_app(
        &self,
        request: NewNotification,
        channels: Vec<NotificationChannel>,
    ) -> Result<NotificationId, Error> {
        let notification: Notification =
            request.into_notification(NotificationId::random(), channels, self.clock.utc());
        self.notifications
            .insert(&notification)
            .await
            .map_err(Self::map_notification_error)?;
        Ok(notification.id)
    }
}

#[async_trait]
impl<R, P> NotificationsQuery for NotificationService<R, P>
where
    R: NotificationRepository,
    P: NotificationPreferencesRepository,
{
    async fn list(
        &self,
        user_id: &UserId,
        query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list(user_id, query)
            .await
            .map_err(Self::map_notification_error)
    }

    async fn count_unread(&self, user_id: &UserId) -> u64 {
        match self.notifications.count_unread(user_id).await {
            Ok(count) => count,
            Err(error) => {
                warn!(%error, "unread notification count failed; reporting zero");
                0
            }
        }
    }

    async fn preferences(&self, user_id: &UserId) -> Result<NotificationPreferences, Error> {
        self.load_or_create_preferences(user_id).await
    }
}

#[async_trait]
impl<R, P> NotificationsCommand for NotificationService<R, P>
where
    R: NotificationRepository,
    P: NotificationPreferencesRepository,
{
    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<(), Error> {
        let found = self
            .notifications
            .mark_read(user_id, id, self.clock.utc())
            .await
            .map_err(Self::map_notification_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found("notification not found"))
        }
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<u64, Error> {
        let updated = self
            .notifications
            .mark_all_read(user_id, self.clock.utc())
            .await
            .map_err(Self::map_notification_error)?;
        info!(updated, "notifications marked read");
        Ok(updated)
    }

    async fn update_preferences(
        &self,
        user_id: &UserId,
        patch: &NotificationPreferencesPatch,
    ) -> Result<NotificationPreferences, Error> {
        let current = self.load_or_create_preferences(user_id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let updated = patch.apply(current, self.clock.utc());
        self.preferences
            .save(&updated)
            .await
            .map_err(Self::map_preferences_error)?;
        Ok(updated)
    }

    async fn notify(&self, request: NewNotification) -> Result<NotifyOutcome, Error> {
        let prefs = self.load_or_create_preferences(request.user_id()).await?;
        let channels = match prefs.route(&request) {
            Ok(channels) => channels,
            Err(reason) => {
                info!(
                    kind = %request.kind(),
                    reason = reason.as_str(),
                    "notification skipped"
                );
                return Ok(NotifyOutcome::Skipped(reason));
            }
        };

        let kind = request.kind();
        let stored = if channels.contains(&NotificationChannel::InApp) {
            Some(self.store_in_app(request, channels.clone()).await?)
        } else {
            None
        };

        let external: Vec<&'static str> = channels
            .iter()
            .filter(|channel| **channel != NotificationChannel::InApp)
            .map(|channel| channel.as_str())
            .collect();
        if !external.is_empty() {
            info!(
                %kind,
                channels = ?external,
                "external delivery left to the dispatch service"
            );
        }

        Ok(NotifyOutcome::Delivered { stored, channels })
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
