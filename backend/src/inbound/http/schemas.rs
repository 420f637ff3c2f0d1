//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers below mirror their serialised shape and register under the
//! domain type's path via `#[schema(as = ...)]`.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with current state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "limit must be between 1 and 100, got 0")]
    message: String,
    /// Request trace identifier, also sent as the `trace-id` header.
    #[schema(example = "7f1c1a53-4a7e-4b5e-9b52-1d8f7c3e2a10")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field":"limit","code":"out_of_range"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Notification`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Notification, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NotificationSchema {
    #[schema(example = "0b6f4d3e-8d1a-4c55-9f0e-3c2b1a9d8e7f")]
    id: String,
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    user_id: String,
    /// Event kind such as `NEW_MESSAGE` or `PAYMENT_COMPLETED`.
    #[schema(rename = "type", example = "NEW_MESSAGE")]
    kind: String,
    #[schema(example = "Nuevo mensaje")]
    title: String,
    message: String,
    /// Delivery channels: `in_app`, `email`, `push`.
    #[schema(example = json!(["in_app", "email"]))]
    channels: Vec<String>,
    metadata: Option<serde_json::Value>,
    related_id: Option<String>,
    #[schema(example = "message")]
    related_type: Option<String>,
    read: bool,
    #[schema(format = DateTime)]
    read_at: Option<String>,
    #[schema(format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::NotificationPreferences`].
#[derive(ToSchema)]
#[schema(as = crate::domain::NotificationPreferences, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NotificationPreferencesSchema {
    user_id: String,
    email_enabled: bool,
    in_app_enabled: bool,
    push_enabled: bool,
    new_messages: bool,
    message_replies: bool,
    property_inquiries: bool,
    property_status_change: bool,
    property_expiring: bool,
    favorites_updates: bool,
    new_properties_in_area: bool,
    likes_received: bool,
    new_followers: bool,
    payment_completed: bool,
    plan_expiring: bool,
    invoice_ready: bool,
    system_announcements: bool,
    security_alerts: bool,
    promotional_emails: bool,
    newsletter: bool,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::NotificationPreferencesPatch`].
///
/// Every field is optional; unknown fields are rejected.
#[derive(ToSchema)]
#[schema(as = crate::domain::NotificationPreferencesPatch, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NotificationPreferencesPatchSchema {
    email_enabled: Option<bool>,
    in_app_enabled: Option<bool>,
    push_enabled: Option<bool>,
    new_messages: Option<bool>,
    message_replies: Option<bool>,
    property_inquiries: Option<bool>,
    property_status_change: Option<bool>,
    property_expiring: Option<bool>,
    favorites_updates: Option<bool>,
    new_properties_in_area: Option<bool>,
    likes_received: Option<bool>,
    new_followers: Option<bool>,
    payment_completed: Option<bool>,
    plan_expiring: Option<bool>,
    invoice_ready: Option<bool>,
    system_announcements: Option<bool>,
    security_alerts: Option<bool>,
    promotional_emails: Option<bool>,
    newsletter: Option<bool>,
}
