//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::test as actix_test;
use actix_web::{App, web};
use rstest::{fixture, rstest};
use serde::Deserialize;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> String {
    TRACE_ID.to_owned()
}

async fn render(error: Error) -> (StatusCode, Option<String>, Error) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let payload = serde_json::from_slice(&bytes).expect("error payload deserialises");
    (status, header, payload)
}

#[rstest]
#[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
#[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
#[case(ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
#[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
fn every_code_has_a_status(#[case] code: ErrorCode, #[case] expected: StatusCode) {
    assert_eq!(status_for(code), expected);
    assert_eq!(ResponseError::status_code(&Error::new(code, "x")), expected);
}

#[rstest]
#[case(Error::internal("syntax error at or near \"FROM\""), "Internal server error")]
#[case(
    Error::service_unavailable("could not connect to db.internal:5432"),
    "Service temporarily unavailable"
)]
#[actix_web::test]
async fn server_failures_are_redacted(
    trace_id: String,
    #[case] error: Error,
    #[case] expected_message: &str,
) {
    let error = error
        .with_trace_id(trace_id.clone())
        .with_details(serde_json::json!({ "sql": "SELECT 1" }));

    let (_, header, payload) = render(error).await;

    assert_eq!(header.as_deref(), Some(trace_id.as_str()));
    assert_eq!(payload.message(), expected_message);
    assert_eq!(payload.trace_id(), Some(trace_id.as_str()));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_their_details(trace_id: String) {
    let error = Error::not_found("notification not found")
        .with_trace_id(trace_id)
        .with_details(serde_json::json!({ "field": "id" }));

    let (status, _, payload) = render(error).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload.message(), "notification not found");
    assert_eq!(payload.details(), Some(&serde_json::json!({ "field": "id" })));
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_omits_header() {
    let (_, header, payload) = render(Error::unauthorized("login required")).await;
    assert!(header.is_none());
    assert!(payload.trace_id().is_none());
}

#[rstest]
fn actix_errors_become_generic_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert!(err.details().is_none());
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[expect(dead_code, reason = "only deserialised to exercise the extractor")]
    limit: u32,
}

#[rstest]
#[case("/query?limit=lots")]
#[case("/path/not-a-number")]
#[actix_web::test]
async fn extractor_failures_use_the_error_envelope(#[case] uri: &str) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .route(
                "/query",
                web::get().to(|_: web::Query<Paging>| async { HttpResponse::Ok() }),
            )
            .route(
                "/path/{n}",
                web::get().to(|_: web::Path<u32>| async { HttpResponse::Ok() }),
            ),
    )
    .await;

    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "malformed");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_bodies_are_invalid_requests() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route(
                "/body",
                web::post().to(|_: web::Json<serde_json::Value>| async { HttpResponse::Ok() }),
            ),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/body")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["source"], "body");
}
