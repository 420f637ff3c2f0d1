//! Validation helpers shared by inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` [`Error`] whose `details` carry
//! the offending `field`, a machine-readable `code`, and the raw `value` when
//! one was supplied.

use serde_json::json;

use crate::domain::{
    Error, LoginValidationError, NotificationId, NotificationListQuery,
    NotificationValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    OutOfRange,
    Empty,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::Empty => "empty",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const NOTIFICATION_ID: FieldName = FieldName::new("id");
pub(crate) const LIMIT: FieldName = FieldName::new("limit");
pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const TITLE: FieldName = FieldName::new("title");
pub(crate) const MESSAGE: FieldName = FieldName::new("message");

/// Builder for validation errors with field context.
struct ValidationError {
    field: FieldName,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<serde_json::Value>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must not be empty")).with_code(ErrorCode::Empty)
}

pub(crate) fn parse_notification_id(value: &str) -> Result<NotificationId, Error> {
    NotificationId::new(value).map_err(|_| invalid_uuid_error(NOTIFICATION_ID, value))
}

pub(crate) fn parse_list_query(
    unread_only: Option<bool>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<NotificationListQuery, Error> {
    NotificationListQuery::new(unread_only.unwrap_or(false), limit, offset).map_err(|err| match err
    {
        NotificationValidationError::LimitOutOfRange { limit, .. } => {
            ValidationError::new(LIMIT, err.to_string()).with_value(ErrorCode::OutOfRange, limit)
        }
        other => Error::invalid_request(other.to_string()),
    })
}

pub(crate) fn map_notification_validation_error(err: NotificationValidationError) -> Error {
    match err {
        NotificationValidationError::EmptyTitle => empty_field_error(TITLE),
        NotificationValidationError::EmptyMessage => empty_field_error(MESSAGE),
        other => Error::invalid_request(other.to_string()),
    }
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => empty_field_error(USERNAME),
        LoginValidationError::EmptyPassword => empty_field_error(PASSWORD),
    }
}
