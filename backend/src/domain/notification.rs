//! Notification records and the values they carry.
//!
//! A [`Notification`] belongs to exactly one user. Only its read state is
//! mutated after creation. Types map onto a [`PreferenceCategory`] so users can
//! opt out of whole groups at once.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{PreferenceCategory, UserId};

/// Default page size for notification listings.
pub const DEFAULT_NOTIFICATION_LIMIT: u32 = 20;
/// Largest accepted page size for notification listings.
pub const MAX_NOTIFICATION_LIMIT: u32 = 100;

/// Validation failures for notification inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationValidationError {
    /// Notification id was not a UUID.
    #[error("notification id must be a valid UUID")]
    InvalidId,
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Message body was blank.
    #[error("message must not be empty")]
    EmptyMessage,
    /// Page size outside `1..=100`.
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Requested limit.
        limit: u32,
        /// Inclusive upper bound.
        max: u32,
    },
    /// Stored type string is not recognised.
    #[error("unknown notification type: {value}")]
    UnknownType {
        /// Raw value.
        value: String,
    },
    /// Stored channel string is not recognised.
    #[error("unknown notification channel: {value}")]
    UnknownChannel {
        /// Raw value.
        value: String,
    },
}

macro_rules! notification_types {
    ($( $variant:ident => $code:literal, $category:ident; )*) => {
        /// Kind of event a notification reports.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum NotificationType {
            $(
                #[serde(rename = $code)]
                #[doc = concat!("`", $code, "`")]
                $variant,
            )*
        }

        impl NotificationType {
            /// Every known type in declaration order.
            pub const ALL: &'static [NotificationType] = &[$(Self::$variant),*];

            /// Stored SCREAMING_SNAKE_CASE code.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)*
                }
            }

            /// Preference category that gates this type.
            pub fn category(self) -> PreferenceCategory {
                match self {
                    $(Self::$variant => PreferenceCategory::$category,)*
                }
            }
        }

        impl FromStr for NotificationType {
            type Err = NotificationValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Self::$variant),)*
                    other => Err(NotificationValidationError::UnknownType {
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

notification_types! {
    NewMessage => "NEW_MESSAGE", NewMessages;
    MessageReply => "MESSAGE_REPLY", MessageReplies;
    InquiryReceived => "INQUIRY_RECEIVED", PropertyInquiries;
    InquiryReply => "INQUIRY_REPLY", PropertyInquiries;
    PropertyStatusChanged => "PROPERTY_STATUS_CHANGED", PropertyStatusChange;
    PropertyExpiring => "PROPERTY_EXPIRING", PropertyExpiring;
    FavoritePropertyUpdated => "FAVORITE_PROPERTY_UPDATED", FavoritesUpdates;
    NewPropertyInArea => "NEW_PROPERTY_IN_AREA", NewPropertiesInArea;
    LikeReceived => "LIKE_RECEIVED", LikesReceived;
    NewFollower => "NEW_FOLLOWER", NewFollowers;
    PaymentCompleted => "PAYMENT_COMPLETED", PaymentCompleted;
    PlanExpiring => "PLAN_EXPIRING", PlanExpiring;
    PlanExpired => "PLAN_EXPIRED", PlanExpiring;
    InvoiceReady => "INVOICE_READY", InvoiceReady;
    NewFounderRegistered => "NEW_FOUNDER_REGISTERED", SystemAnnouncements;
    Welcome => "WELCOME", SystemAnnouncements;
    EmailVerified => "EMAIL_VERIFIED", SystemAnnouncements;
    SystemAnnouncement => "SYSTEM_ANNOUNCEMENT", SystemAnnouncements;
    SecurityAlert => "SECURITY_ALERT", SecurityAlerts;
    Promotional => "PROMOTIONAL", PromotionalEmails;
    Newsletter => "NEWSLETTER", Newsletter;
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery channel for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    /// Transactional email.
    Email,
    /// Stored in the notification inbox.
    InApp,
    /// Mobile/web push.
    Push,
}

impl NotificationChannel {
    /// Channels used when a sender does not request any.
    pub const DEFAULTS: [NotificationChannel; 2] = [Self::InApp, Self::Email];

    /// Stored snake_case code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::InApp => "in_app",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationChannel {
    type Err = NotificationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "in_app" => Ok(Self::InApp),
            "push" => Ok(Self::Push),
            other => Err(NotificationValidationError::UnknownChannel {
                value: other.to_owned(),
            }),
        }
    }
}

/// Notification identifier.
///
/// # Examples
/// ```
/// use arrienda_backend::domain::NotificationId;
///
/// let id = NotificationId::new("0b6f5a52-3c1e-4a55-9d59-7f3b8f6f2a10").unwrap();
/// assert_eq!(id.to_string(), "0b6f5a52-3c1e-4a55-9d59-7f3b8f6f2a10");
/// assert!(NotificationId::new("42").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Parse an identifier from its textual form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NotificationValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| NotificationValidationError::InvalidId)
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Identifier.
    pub id: NotificationId,
    /// Owner.
    pub user_id: UserId,
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Channels the notification was delivered through.
    pub channels: Vec<NotificationChannel>,
    /// Free-form sender metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Identifier of the entity the notification is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    /// Kind of the related entity (`message`, `property`, `payment`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_type: Option<String>,
    /// Read flag.
    pub read: bool,
    /// First time the notification was marked read.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Request to deliver a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    user_id: UserId,
    kind: NotificationType,
    title: String,
    message: String,
    channels: Option<Vec<NotificationChannel>>,
    metadata: Option<Value>,
    related_id: Option<String>,
    related_type: Option<String>,
}

impl NewNotification {
    /// Validate the required parts of a notification request.
    pub fn try_new(
        user_id: UserId,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, NotificationValidationError> {
        let title = title.into();
        let message = message.into();
        if title.trim().is_empty() {
            return Err(NotificationValidationError::EmptyTitle);
        }
        if message.trim().is_empty() {
            return Err(NotificationValidationError::EmptyMessage);
        }
        Ok(Self {
            user_id,
            kind,
            title,
            message,
            channels: None,
            metadata: None,
            related_id: None,
            related_type: None,
        })
    }

    /// Request specific channels instead of [`NotificationChannel::DEFAULTS`].
    #[must_use]
    pub fn with_channels(mut self, channels: Vec<NotificationChannel>) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Attach sender metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Point the notification at a related entity.
    #[must_use]
    pub fn with_related(mut self, id: impl Into<String>, kind: impl Into<String>) -> Self {
        self.related_id = Some(id.into());
        self.related_type = Some(kind.into());
        self
    }

    /// Recipient.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Event kind.
    pub fn kind(&self) -> NotificationType {
        self.kind
    }

    /// Channels requested by the sender, deduplicated in request order.
    pub fn requested_channels(&self) -> Vec<NotificationChannel> {
        let requested = self
            .channels
            .as_deref()
            .unwrap_or(&NotificationChannel::DEFAULTS);
        let mut unique = Vec::with_capacity(requested.len());
        for channel in requested {
            if !unique.contains(channel) {
                unique.push(*channel);
            }
        }
        unique
    }

    /// Materialise the stored record for the given delivery channels.
    pub fn into_notification(
        self,
        id: NotificationId,
        channels: Vec<NotificationChannel>,
        created_at: DateTime<Utc>,
    ) -> Notification {
        Notification {
            id,
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            channels,
            metadata: self.metadata,
            related_id: self.related_id,
            related_type: self.related_type,
            read: false,
            read_at: None,
            created_at,
        }
    }
}

/// Reason a notification request produced no delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The type's category is switched off.
    DisabledByPreference,
    /// Every requested channel is switched off.
    NoEnabledChannels,
}

impl SkipReason {
    /// Stable snake_case code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DisabledByPreference => "disabled_by_preference",
            Self::NoEnabledChannels => "no_enabled_channels",
        }
    }
}

/// Result of a notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// At least one channel survived the user's preferences.
    Delivered {
        /// Inbox record, present when `in_app` survived.
        stored: Option<NotificationId>,
        /// Surviving channels in request order.
        channels: Vec<NotificationChannel>,
    },
    /// Nothing was delivered.
    Skipped(SkipReason),
}

/// Validated listing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationListQuery {
    unread_only: bool,
    limit: u32,
    offset: u32,
}

impl Default for NotificationListQuery {
    fn default() -> Self {
        Self {
            unread_only: false,
            limit: DEFAULT_NOTIFICATION_LIMIT,
            offset: 0,
        }
    }
}

impl NotificationListQuery {
    /// Build a query, applying defaults for omitted values.
    ///
    /// # Examples
    /// ```
    /// use arrienda_backend::domain::NotificationListQuery;
    ///
    /// let query = NotificationListQuery::new(true, None, None).unwrap();
    /// assert_eq!(query.limit(), 20);
    /// assert!(NotificationListQuery::new(false, Some(0), None).is_err());
    /// ```
    pub fn new(
        unread_only: bool,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Self, NotificationValidationError> {
        let limit = limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT);
        if !(1..=MAX_NOTIFICATION_LIMIT).contains(&limit) {
            return Err(NotificationValidationError::LimitOutOfRange {
                limit,
                max: MAX_NOTIFICATION_LIMIT,
            });
        }
        Ok(Self {
            unread_only,
            limit,
            offset: offset.unwrap_or(0),
        })
    }

    /// Whether read notifications are excluded.
    pub fn unread_only(&self) -> bool {
        self.unread_only
    }

    /// Page size.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn every_type_round_trips_through_its_code() {
        assert_eq!(NotificationType::ALL.len(), 21);
        for kind in NotificationType::ALL {
            assert_eq!(kind.as_str().parse::<NotificationType>(), Ok(*kind));
        }
    }

    #[rstest]
    #[case(NotificationType::InquiryReply, PreferenceCategory::PropertyInquiries)]
    #[case(NotificationType::PlanExpired, PreferenceCategory::PlanExpiring)]
    #[case(NotificationType::Welcome, PreferenceCategory::SystemAnnouncements)]
    #[case(
        NotificationType::NewFounderRegistered,
        PreferenceCategory::SystemAnnouncements
    )]
    #[case(NotificationType::Promotional, PreferenceCategory::PromotionalEmails)]
    fn types_map_to_categories(
        #[case] kind: NotificationType,
        #[case] category: PreferenceCategory,
    ) {
        assert_eq!(kind.category(), category);
    }

    #[rstest]
    fn unknown_type_is_rejected() {
        let err = "BROADCAST".parse::<NotificationType>().expect_err("unknown");
        assert_eq!(
            err,
            NotificationValidationError::UnknownType {
                value: "BROADCAST".into()
            }
        );
    }

    #[rstest]
    fn channels_serialise_snake_case() {
        let value = serde_json::to_value(NotificationChannel::DEFAULTS).expect("serialise");
        assert_eq!(value, json!(["in_app", "email"]));
    }

    #[rstest]
    #[case(None, None, 20, 0)]
    #[case(Some(1), Some(40), 1, 40)]
    #[case(Some(100), None, 100, 0)]
    fn list_query_accepts_bounds(
        #[case] limit: Option<u32>,
        #[case] offset: Option<u32>,
        #[case] expected_limit: u32,
        #[case] expected_offset: u32,
    ) {
        let query = NotificationListQuery::new(false, limit, offset).expect("valid");
        assert_eq!(query.limit(), expected_limit);
        assert_eq!(query.offset(), expected_offset);
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    fn list_query_rejects_out_of_range_limit(#[case] limit: u32) {
        let err = NotificationListQuery::new(false, Some(limit), None).expect_err("invalid");
        assert!(matches!(
            err,
            NotificationValidationError::LimitOutOfRange { .. }
        ));
    }

    #[rstest]
    #[case("", "body", NotificationValidationError::EmptyTitle)]
    #[case("title", "  ", NotificationValidationError::EmptyMessage)]
    fn new_notification_requires_text(
        #[case] title: &str,
        #[case] message: &str,
        #[case] expected: NotificationValidationError,
    ) {
        let err = NewNotification::try_new(
            UserId::random(),
            NotificationType::NewMessage,
            title,
            message,
        )
        .expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn requested_channels_default_and_dedupe() {
        let base = NewNotification::try_new(
            UserId::random(),
            NotificationType::NewMessage,
            "Nuevo mensaje",
            "Tenés un mensaje nuevo",
        )
        .expect("valid");
        assert_eq!(
            base.requested_channels(),
            vec![NotificationChannel::InApp, NotificationChannel::Email]
        );

        let custom = base.with_channels(vec![
            NotificationChannel::Push,
            NotificationChannel::Push,
            NotificationChannel::InApp,
        ]);
        assert_eq!(
            custom.requested_channels(),
            vec![NotificationChannel::Push, NotificationChannel::InApp]
        );
    }

    #[rstest]
    fn notification_serialises_camel_case_with_type_key() {
        let created_at = Utc::now();
        let notification = NewNotification::try_new(
            UserId::random(),
            NotificationType::InquiryReceived,
            "Consulta",
            "Recibiste una consulta",
        )
        .expect("valid")
        .with_related("prop-1", "property")
        .into_notification(
            NotificationId::random(),
            vec![NotificationChannel::InApp],
            created_at,
        );

        let value = serde_json::to_value(&notification).expect("serialise");
        assert_eq!(value["type"], "INQUIRY_RECEIVED");
        assert_eq!(value["relatedId"], "prop-1");
        assert_eq!(value["read"], false);
        assert!(value["readAt"].is_null());
        assert!(value.get("metadata").is_none());
    }
}
