//! Notification inbox handlers.
//!
//! ```text
//! GET /api/notifications?unreadOnly=true&limit=20&offset=0
//! POST /api/notifications {"type":"NEW_MESSAGE","title":"...","message":"..."}
//! GET /api/notifications/unread-count
//! PUT /api/notifications/mark-all-read
//! PUT /api/notifications/{id}/read
//! GET /api/notifications/preferences
//! PUT /api/notifications/preferences {"pushEnabled":true}
//! ```
//!
//! Responses keep the `{"success": true, ...}` envelope the web client already
//! understands. Failures use the shared error payload.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, NewNotification, Notification, NotificationChannel, NotificationId,
    NotificationPreferences, NotificationPreferencesPatch, NotificationType, NotifyOutcome,
    UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{private_no_cache_header, private_no_store_header};
use crate::inbound::http::schemas::{
    ErrorSchema, NotificationPreferencesPatchSchema, NotificationPreferencesSchema,
    NotificationSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_notification_validation_error, parse_list_query, parse_notification_id,
};

/// Query parameters for listing notifications.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NotificationListParams {
    /// Only return unread notifications.
    pub unread_only: Option<bool>,
    /// Page size, 1 to 100. Defaults to 20.
    pub limit: Option<u32>,
    /// Rows to skip. Defaults to 0.
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationListResponse {
    success: bool,
    #[schema(value_type = Vec<NotificationSchema>)]
    notifications: Vec<Notification>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationCountResponse {
    success: bool,
    count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    success: bool,
    updated: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationPreferencesResponse {
    success: bool,
    #[schema(value_type = NotificationPreferencesSchema)]
    preferences: NotificationPreferences,
}

impl From<NotificationPreferences> for NotificationPreferencesResponse {
    fn from(preferences: NotificationPreferences) -> Self {
        Self {
            success: true,
            preferences,
        }
    }
}

/// Body of `POST /api/notifications`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotifyRequest {
    /// Notification type code, e.g. `NEW_MESSAGE`.
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "NEW_MESSAGE")]
    pub kind: NotificationType,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Requested channels; defaults to `in_app` and `email`.
    #[schema(value_type = Option<Vec<String>>)]
    pub channels: Option<Vec<NotificationChannel>>,
    /// Free-form sender metadata.
    pub metadata: Option<Value>,
    /// Identifier of the entity the notification is about.
    pub related_id: Option<String>,
    /// Kind of the related entity. Required with `relatedId`.
    pub related_type: Option<String>,
}

impl NotifyRequest {
    fn into_domain(self, user_id: UserId) -> Result<NewNotification, Error> {
        let Self {
            kind,
            title,
            message,
            channels,
            metadata,
            related_id,
            related_type,
        } = self;

        let mut request = NewNotification::try_new(user_id, kind, title, message)
            .map_err(map_notification_validation_error)?;
        if let Some(channels) = channels {
            request = request.with_channels(channels);
        }
        if let Some(metadata) = metadata {
            request = request.with_metadata(metadata);
        }
        match (related_id, related_type) {
            (Some(id), Some(kind)) => request = request.with_related(id, kind),
            (None, None) => {}
            _ => {
                return Err(Error::invalid_request(
                    "relatedId and relatedType must be sent together",
                ));
            }
        }
        Ok(request)
    }
}

/// Outcome of a notification request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    success: bool,
    delivered: bool,
    /// Inbox record, present when `in_app` survived the preferences.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    notification_id: Option<NotificationId>,
    #[schema(value_type = Vec<String>)]
    channels: Vec<NotificationChannel>,
    /// `disabled_by_preference` or `no_enabled_channels`.
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped_reason: Option<&'static str>,
}

impl From<NotifyOutcome> for NotifyResponse {
    fn from(outcome: NotifyOutcome) -> Self {
        match outcome {
            NotifyOutcome::Delivered { stored, channels } => Self {
                success: true,
                delivered: true,
                notification_id: stored,
                channels,
                skipped_reason: None,
            },
            NotifyOutcome::Skipped(reason) => Self {
                success: true,
                delivered: false,
                notification_id: None,
                channels: Vec::new(),
                skipped_reason: Some(reason.as_str()),
            },
        }
    }
}

/// List the signed-in user's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationListParams),
    responses(
        (status = 200, description = "Notifications", body = NotificationListResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<NotificationListParams>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let NotificationListParams {
        unread_only,
        limit,
        offset,
    } = params.into_inner();
    let query = parse_list_query(unread_only, limit, offset)?;
    let notifications = state.notifications.list(&user_id, &query).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(NotificationListResponse {
            success: true,
            notifications,
        }))
}

/// Raise a notification for the signed-in user, subject to their preferences.
///
/// A request the preferences switch off is not an error: the response reports
/// `delivered: false` with the reason.
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = NotifyRequest,
    responses(
        (status = 200, description = "Delivery outcome", body = NotifyResponse),
        (status = 400, description = "Invalid notification", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "createNotification"
)]
#[post("/notifications")]
pub async fn create_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NotifyRequest>,
) -> ApiResult<web::Json<NotifyResponse>> {
    let user_id = session.require_user_id()?;
    let request = payload.into_inner().into_domain(user_id)?;
    let outcome = state.notifications_command.notify(request).await?;
    Ok(web::Json(NotifyResponse::from(outcome)))
}

/// Count unread notifications. Store failures report zero.
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notifications", body = NotificationCountResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "countUnreadNotifications"
)]
#[get("/notifications/unread-count")]
pub async fn unread_notification_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let count = state.notifications.count_unread(&user_id).await;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(NotificationCountResponse {
            success: true,
            count,
        }))
}

/// Mark every unread notification as read.
#[utoipa::path(
    put,
    path = "/api/notifications/mark-all-read",
    responses(
        (status = 200, description = "Rows updated", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[put("/notifications/mark-all-read")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MarkAllReadResponse>> {
    let user_id = session.require_user_id()?;
    let updated = state.notifications_command.mark_all_read(&user_id).await?;
    Ok(web::Json(MarkAllReadResponse {
        success: true,
        updated,
    }))
}

/// Mark one notification as read. Repeating the call is harmless.
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification UUID")),
    responses(
        (status = 200, description = "Marked read", body = SuccessResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such notification for this user", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[put("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_notification_id(&path.into_inner())?;
    state.notifications_command.mark_read(&user_id, &id).await?;
    Ok(web::Json(SuccessResponse { success: true }))
}

/// Fetch notification preferences, creating defaults on first access.
#[utoipa::path(
    get,
    path = "/api/notifications/preferences",
    responses(
        (status = 200, description = "Preferences", body = NotificationPreferencesResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "getNotificationPreferences"
)]
#[get("/notifications/preferences")]
pub async fn get_preferences(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let preferences = state.notifications.preferences(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(NotificationPreferencesResponse::from(preferences)))
}

/// Patch notification preferences. Omitted fields keep their value.
#[utoipa::path(
    put,
    path = "/api/notifications/preferences",
    request_body = NotificationPreferencesPatchSchema,
    responses(
        (status = 200, description = "Updated preferences", body = NotificationPreferencesResponse),
        (status = 400, description = "Unknown or mistyped field", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "updateNotificationPreferences"
)]
#[put("/notifications/preferences")]
pub async fn update_preferences(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NotificationPreferencesPatch>,
) -> ApiResult<web::Json<NotificationPreferencesResponse>> {
    let user_id = session.require_user_id()?;
    let preferences = state
        .notifications_command
        .update_preferences(&user_id, &payload.into_inner())
        .await?;
    Ok(web::Json(NotificationPreferencesResponse::from(preferences)))
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
