//! HTTP mapping for domain errors.
//!
//! Handlers return [`crate::domain::Error`] and Actix renders it through the
//! [`ResponseError`] implementation below: a stable status per
//! [`ErrorCode`], the `trace-id` header, and internal details redacted.
//!
//! Extractor failures (malformed JSON bodies, query strings or path segments)
//! are routed through the same envelope via the `*_error_handler` functions,
//! which the server installs as `JsonConfig`/`QueryConfig`/`PathConfig`.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing copy of `error`. Internal and unavailable failures keep only
/// a generic message so SQL text and hostnames stay in the logs.
fn client_view(error: &Error) -> Error {
    let generic = match error.code() {
        ErrorCode::InternalError => Error::internal("Internal server error"),
        ErrorCode::ServiceUnavailable => {
            Error::service_unavailable("Service temporarily unavailable")
        }
        _ => return error.clone(),
    };
    match error.trace_id() {
        Some(id) => generic.with_trace_id(id.to_owned()),
        None => generic,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                message = self.message(),
                trace_id = self.trace_id(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

fn rejected(source: &'static str, reason: String) -> actix_web::Error {
    warn!(source, %reason, "request rejected by extractor");
    Error::invalid_request(format!("malformed request {source}"))
        .with_details(json!({ "source": source, "reason": reason, "code": "malformed" }))
        .into()
}

/// Render JSON body extraction failures as `invalid_request`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("body", err.to_string())
}

/// Render query string extraction failures as `invalid_request`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("query", err.to_string())
}

/// Render path segment extraction failures as `invalid_request`.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    rejected("path", err.to_string())
}

#[cfg(test)]
mod tests;
