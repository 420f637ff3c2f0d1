//! Per-user notification preferences.
//!
//! Preferences hold one toggle per delivery channel and one per
//! [`PreferenceCategory`]. A row is created with [`NotificationPreferences::new_default`]
//! the first time a user's preferences are read.

#![deny(missing_docs)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NewNotification, NotificationChannel, NotificationType, SkipReason, UserId};

/// Group of notification types that share one opt-out toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceCategory {
    /// First message in a conversation.
    NewMessages,
    /// Replies in an existing conversation.
    MessageReplies,
    /// Inquiries about a listing and their replies.
    PropertyInquiries,
    /// A listing changed status.
    PropertyStatusChange,
    /// A listing is about to expire.
    PropertyExpiring,
    /// A favourited listing changed.
    FavoritesUpdates,
    /// New listings in a followed area.
    NewPropertiesInArea,
    /// Someone liked the user's listing or profile.
    LikesReceived,
    /// Someone followed the user.
    NewFollowers,
    /// A payment went through.
    PaymentCompleted,
    /// The subscription plan is expiring or has expired.
    PlanExpiring,
    /// An invoice is available.
    InvoiceReady,
    /// Platform announcements and account lifecycle events.
    SystemAnnouncements,
    /// Security alerts about the account.
    SecurityAlerts,
    /// Promotions.
    PromotionalEmails,
    /// The periodic newsletter.
    Newsletter,
}

/// Channel and category toggles for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    /// Owner of the preferences.
    pub user_id: UserId,
    /// Deliver over the email channel.
    pub email_enabled: bool,
    /// Deliver over the in-app inbox channel.
    pub in_app_enabled: bool,
    /// Deliver over the push channel.
    pub push_enabled: bool,
    /// Allow notifications in [`PreferenceCategory::NewMessages`].
    pub new_messages: bool,
    /// Allow notifications in [`PreferenceCategory::MessageReplies`].
    pub message_replies: bool,
    /// Allow notifications in [`PreferenceCategory::PropertyInquiries`].
    pub property_inquiries: bool,
    /// Allow notifications in [`PreferenceCategory::PropertyStatusChange`].
    pub property_status_change: bool,
    /// Allow notifications in [`PreferenceCategory::PropertyExpiring`].
    pub property_expiring: bool,
    /// Allow notifications in [`PreferenceCategory::FavoritesUpdates`].
    pub favorites_updates: bool,
    /// Allow notifications in [`PreferenceCategory::NewPropertiesInArea`].
    pub new_properties_in_area: bool,
    /// Allow notifications in [`PreferenceCategory::LikesReceived`].
    pub likes_received: bool,
    /// Allow notifications in [`PreferenceCategory::NewFollowers`].
    pub new_followers: bool,
    /// Allow notifications in [`PreferenceCategory::PaymentCompleted`].
    pub payment_completed: bool,
    /// Allow notifications in [`PreferenceCategory::PlanExpiring`].
    pub plan_expiring: bool,
    /// Allow notifications in [`PreferenceCategory::InvoiceReady`].
    pub invoice_ready: bool,
    /// Allow notifications in [`PreferenceCategory::SystemAnnouncements`].
    pub system_announcements: bool,
    /// Allow notifications in [`PreferenceCategory::SecurityAlerts`].
    pub security_alerts: bool,
    /// Allow notifications in [`PreferenceCategory::PromotionalEmails`].
    pub promotional_emails: bool,
    /// Allow notifications in [`PreferenceCategory::Newsletter`].
    pub newsletter: bool,
    /// Last time a toggle changed.
    pub updated_at: DateTime<Utc>,
}

impl NotificationPreferences {
    /// Defaults applied on first access.
    ///
    /// Email and in-app delivery are on, push is off. Every category is on
    /// except area alerts, followers, promotions and the newsletter.
    ///
    /// # Examples
    /// ```
    /// use arrienda_backend::domain::{NotificationPreferences, NotificationType, UserId};
    /// use chrono::Utc;
    ///
    /// let prefs = NotificationPreferences::new_default(UserId::random(), Utc::now());
    /// assert!(prefs.email_enabled && prefs.in_app_enabled && !prefs.push_enabled);
    /// assert!(prefs.allows(NotificationType::NewMessage));
    /// assert!(!prefs.allows(NotificationType::Newsletter));
    /// ```
    pub fn new_default(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email_enabled: true,
            in_app_enabled: true,
            push_enabled: false,
            new_messages: true,
            message_replies: true,
            property_inquiries: true,
            property_status_change: true,
            property_expiring: true,
            favorites_updates: true,
            new_properties_in_area: false,
            likes_received: true,
            new_followers: false,
            payment_completed: true,
            plan_expiring: true,
            invoice_ready: true,
            system_announcements: true,
            security_alerts: true,
            promotional_emails: false,
            newsletter: false,
            updated_at: now,
        }
    }

    /// Whether the category toggle is on.
    pub fn category_enabled(&self, category: PreferenceCategory) -> bool {
        use PreferenceCategory as C;
        match category {
            C::NewMessages => self.new_messages,
            C::MessageReplies => self.message_replies,
            C::PropertyInquiries => self.property_inquiries,
            C::PropertyStatusChange => self.property_status_change,
            C::PropertyExpiring => self.property_expiring,
            C::FavoritesUpdates => self.favorites_updates,
            C::NewPropertiesInArea => self.new_properties_in_area,
            C::LikesReceived => self.likes_received,
            C::NewFollowers => self.new_followers,
            C::PaymentCompleted => self.payment_completed,
            C::PlanExpiring => self.plan_expiring,
            C::InvoiceReady => self.invoice_ready,
            C::SystemAnnouncements => self.system_announcements,
            C::SecurityAlerts => self.security_alerts,
            C::PromotionalEmails => self.promotional_emails,
            C::Newsletter => self.newsletter,
        }
    }

    /// Whether notifications of `kind` may be sent at all.
    pub fn allows(&self, kind: NotificationType) -> bool {
        self.category_enabled(kind.category())
    }

    /// Whether the channel toggle is on.
    pub fn channel_enabled(&self, channel: NotificationChannel) -> bool {
        match channel {
            NotificationChannel::Email => self.email_enabled,
            NotificationChannel::InApp => self.in_app_enabled,
            NotificationChannel::Push => self.push_enabled,
        }
    }

    /// Keep only the requested channels the user has enabled.
    pub fn enabled_channels(&self, requested: &[NotificationChannel]) -> Vec<NotificationChannel> {
        requested
            .iter()
            .copied()
            .filter(|channel| self.channel_enabled(*channel))
            .collect()
    }

    /// Channels a request may use, or why it must be dropped.
    pub fn route(&self, request: &NewNotification) -> Result<Vec<NotificationChannel>, SkipReason> {
        if !self.allows(request.kind()) {
            return Err(SkipReason::DisabledByPreference);
        }
        let channels = self.enabled_channels(&request.requested_channels());
        if channels.is_empty() {
            return Err(SkipReason::NoEnabledChannels);
        }
        Ok(channels)
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotificationPreferencesPatch {
    /// New value for the email channel toggle.
    pub email_enabled: Option<bool>,
    /// New value for the in-app inbox channel toggle.
    pub in_app_enabled: Option<bool>,
    /// New value for the push channel toggle.
    pub push_enabled: Option<bool>,
    /// New value for [`PreferenceCategory::NewMessages`].
    pub new_messages: Option<bool>,
    /// New value for [`PreferenceCategory::MessageReplies`].
    pub message_replies: Option<bool>,
    /// New value for [`PreferenceCategory::PropertyInquiries`].
    pub property_inquiries: Option<bool>,
    /// New value for [`PreferenceCategory::PropertyStatusChange`].
    pub property_status_change: Option<bool>,
    /// New value for [`PreferenceCategory::PropertyExpiring`].
    pub property_expiring: Option<bool>,
    /// New value for [`PreferenceCategory::FavoritesUpdates`].
    pub favorites_updates: Option<bool>,
    /// New value for [`PreferenceCategory::NewPropertiesInArea`].
    pub new_properties_in_area: Option<bool>,
    /// New value for [`PreferenceCategory::LikesReceived`].
    pub likes_received: Option<bool>,
    /// New value for [`PreferenceCategory::NewFollowers`].
    pub new_followers: Option<bool>,
    /// New value for [`PreferenceCategory::PaymentCompleted`].
    pub payment_completed: Option<bool>,
    /// New value for [`PreferenceCategory::PlanExpiring`].
    pub plan_expiring: Option<bool>,
    /// New value for [`PreferenceCategory::InvoiceReady`].
    pub invoice_ready: Option<bool>,
    /// New value for [`PreferenceCategory::SystemAnnouncements`].
    pub system_announcements: Option<bool>,
    /// New value for [`PreferenceCategory::SecurityAlerts`].
    pub security_alerts: Option<bool>,
    /// New value for [`PreferenceCategory::PromotionalEmails`].
    pub promotional_emails: Option<bool>,
    /// New value for [`PreferenceCategory::Newsletter`].
    pub newsletter: Option<bool>,
}

impl NotificationPreferencesPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch, stamping `now` as the update time.
    pub fn apply(
        &self,
        mut prefs: NotificationPreferences,
        now: DateTime<Utc>,
    ) -> NotificationPreferences {
        fn set(target: &mut bool, value: Option<bool>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut prefs.email_enabled, self.email_enabled);
        set(&mut prefs.in_app_enabled, self.in_app_enabled);
        set(&mut prefs.push_enabled, self.push_enabled);
        set(&mut prefs.new_messages, self.new_messages);
        set(&mut prefs.message_replies, self.message_replies);
        set(&mut prefs.property_inquiries, self.property_inquiries);
        set(&mut prefs.property_status_change, self.property_status_change);
        set(&mut prefs.property_expiring, self.property_expiring);
        set(&mut prefs.favorites_updates, self.favorites_updates);
        set(&mut prefs.new_properties_in_area, self.new_properties_in_area);
        set(&mut prefs.likes_received, self.likes_received);
        set(&mut prefs.new_followers, self.new_followers);
        set(&mut prefs.payment_completed, self.payment_completed);
        set(&mut prefs.plan_expiring, self.plan_expiring);
        set(&mut prefs.invoice_ready, self.invoice_ready);
        set(&mut prefs.system_announcements, self.system_announcements);
        set(&mut prefs.security_alerts, self.security_alerts);
        set(&mut prefs.promotional_emails, self.promotional_emails);
        set(&mut prefs.newsletter, self.newsletter);
        prefs.updated_at = now;
        prefs
    }
}
