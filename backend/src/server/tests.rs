//! Tests for server bootstrap and routing.

use super::*;
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn fixture_config() -> ServerConfig {
    ServerConfig::new(
        Key::generate(),
        false,
        SameSite::Lax,
        "127.0.0.1:0".parse().expect("socket address"),
    )
}

fn deps(health_state: web::Data<HealthState>, config: &ServerConfig) -> AppDependencies {
    AppDependencies {
        health_state,
        http_state: build_http_state(config),
        key: config.key.clone(),
        cookie_secure: config.cookie_secure,
        same_site: config.same_site,
    }
}

#[rstest]
#[actix_web::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    fixture_config: ServerConfig,
) {
    let _server = create_server(health_state.clone(), fixture_config).expect("server binds");
    assert!(health_state.is_ready());
}

#[rstest]
#[actix_web::test]
async fn anonymous_badge_is_zero_through_the_full_stack(
    health_state: web::Data<HealthState>,
    fixture_config: ServerConfig,
) {
    let app = test::init_service(build_app(deps(health_state, &fixture_config))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/messages/unread-count")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["count"], 0);
}

#[rstest]
#[actix_web::test]
async fn login_then_badge_uses_the_session(
    health_state: web::Data<HealthState>,
    fixture_config: ServerConfig,
) {
    let app = test::init_service(build_app(deps(health_state, &fixture_config))).await;

    let login_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "username": "admin", "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/notifications/unread-count")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["count"], 0);
}

#[rstest]
#[actix_web::test]
async fn anonymous_inbox_requests_are_unauthorised(
    health_state: web::Data<HealthState>,
    fixture_config: ServerConfig,
) {
    let app = test::init_service(build_app(deps(health_state, &fixture_config))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/notifications?limit=500")
            .to_request(),
    )
    .await;

    // Authentication is checked before paging.
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
}
