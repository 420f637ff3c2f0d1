//! Domain primitives, services and ports.
//!
//! Purpose: hold the messaging read-side model (schema variants, unread
//! aggregation, notifications) independent of HTTP and SQL. Inbound adapters
//! depend on the driving ports in [`ports`]; outbound adapters implement the
//! driven ones.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic error payload.
//! - [`SchemaVariant`], [`SchemaDetection`], [`SchemaDetectionService`]:
//!   live layout detection.
//! - [`UnreadTotal`], [`UnreadAggregatorService`]: unread message counts.
//! - [`Notification`], [`NotificationPreferences`], [`NotificationService`]:
//!   the notification inbox.

pub mod auth;
pub mod error;
pub mod notification;
pub mod notification_preferences;
pub mod notification_service;
pub mod ports;
pub mod schema_detector;
pub mod schema_variant;
pub mod trace_id;
pub mod unread;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::notification::{
    DEFAULT_NOTIFICATION_LIMIT, MAX_NOTIFICATION_LIMIT, NewNotification, Notification,
    NotificationChannel, NotificationId, NotificationListQuery, NotificationType,
    NotificationValidationError, NotifyOutcome, SkipReason,
};
pub use self::notification_preferences::{
    NotificationPreferences, NotificationPreferencesPatch, PreferenceCategory,
};
pub use self::notification_service::NotificationService;
pub use self::schema_detector::SchemaDetectionService;
pub use self::schema_variant::{
    ConversationTables, DetectionReason, LEGACY_CONVERSATION_TABLE, LEGACY_PARTICIPANT_COLUMNS,
    LegacyLayout, MODERN_CONVERSATION_TABLE, MODERN_PARTICIPANT_COLUMNS,
    SNAKE_LEGACY_PARTICIPANT_COLUMNS, SchemaDetection, SchemaProbeReport, SchemaVariant,
    TableShape,
};
pub use self::trace_id::TraceId;
pub use self::unread::{UNREAD_RPC_FLAG, UnreadAggregatorService, UnreadTotal, unread_rpc_enabled};
pub use self::user::{ProfileId, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use arrienda_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
