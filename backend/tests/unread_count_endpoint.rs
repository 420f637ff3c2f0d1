//! Behaviour of `GET /api/messages/unread-count` across schema layouts.
//!
//! Each case wires the real schema detector and unread aggregator to canned
//! probes and counts, then drives the endpoint through the session cookie.

mod support;

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::CACHE_CONTROL;
use actix_web::test;
use arrienda_backend::domain::ports::{CommunityUnreadSource, FIXTURE_USER_ID, UnreadCountQuery};
use arrienda_backend::domain::{
    LEGACY_CONVERSATION_TABLE, MODERN_CONVERSATION_TABLE, ProfileId, SchemaDetectionService,
    UnreadAggregatorService, UserId,
};
use arrienda_backend::test_support::{
    MutableClock, StaticCommunityUnreadSource, StaticPropertyUnreadRepository, StaticSchemaProbe,
};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use support::{fixture_ports, init_app, login_cookie};

fn fixture_user() -> UserId {
    UserId::new(FIXTURE_USER_ID).expect("fixture user id")
}

fn aggregator(
    probe: StaticSchemaProbe,
    property: StaticPropertyUnreadRepository,
    community: Vec<StaticCommunityUnreadSource>,
) -> Arc<dyn UnreadCountQuery> {
    let now = Utc
        .with_ymd_and_hms(2026, 4, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    let detector = SchemaDetectionService::new(
        Arc::new(probe),
        Arc::new(MutableClock::new(now)),
        Duration::from_secs(30),
    );
    Arc::new(UnreadAggregatorService::new(
        Arc::new(detector),
        Arc::new(property),
        community
            .into_iter()
            .map(|source| Arc::new(source) as Arc<dyn CommunityUnreadSource>)
            .collect(),
    ))
}

fn legacy_probe() -> StaticSchemaProbe {
    StaticSchemaProbe::default()
        .with_profile(fixture_user())
        .with_table(LEGACY_CONVERSATION_TABLE, &["id", "aId", "bId", "isActive"])
}

fn modern_probe() -> StaticSchemaProbe {
    StaticSchemaProbe::default().with_table(
        MODERN_CONVERSATION_TABLE,
        &["id", "sender_id", "receiver_id", "created_at"],
    )
}

fn profile() -> ProfileId {
    ProfileId::new("ckprofile0001").expect("profile id")
}

async fn badge_for(unread: Arc<dyn UnreadCountQuery>) -> (StatusCode, Option<String>, Value) {
    let mut ports = fixture_ports();
    ports.unread = unread;
    let app = init_app(ports).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/messages/unread-count")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let status = res.status();
    let cache_control = res
        .headers()
        .get(CACHE_CONTROL)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    (status, cache_control, test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn legacy_layout_sums_property_and_community() {
    let unread = aggregator(
        legacy_probe(),
        StaticPropertyUnreadRepository::legacy(profile(), 3),
        vec![StaticCommunityUnreadSource::count("user_messages", 2)],
    );

    let (status, cache_control, body) = badge_for(unread).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some("private, no-store"));
    assert_eq!(body, json!({ "count": 5 }));
}

#[rstest]
#[actix_web::test]
async fn modern_layout_falls_through_failing_community_sources() {
    let unread = aggregator(
        modern_probe(),
        StaticPropertyUnreadRepository::modern(4),
        vec![
            StaticCommunityUnreadSource::failing("rpc_get_unread_messages_count"),
            StaticCommunityUnreadSource::failing("user_messages"),
            StaticCommunityUnreadSource::count("community_conversations", 1),
        ],
    );

    let (_, _, body) = badge_for(unread).await;

    assert_eq!(body, json!({ "count": 5 }));
}

#[rstest]
#[case::no_tables(StaticSchemaProbe::default(), StaticPropertyUnreadRepository::failing())]
#[case::property_store_down(legacy_probe(), StaticPropertyUnreadRepository::failing())]
#[case::negative_count(modern_probe(), StaticPropertyUnreadRepository::modern(-7))]
#[actix_web::test]
async fn failures_and_nonsense_counts_report_zero(
    #[case] probe: StaticSchemaProbe,
    #[case] property: StaticPropertyUnreadRepository,
) {
    let unread = aggregator(
        probe,
        property,
        vec![StaticCommunityUnreadSource::failing("user_messages")],
    );

    let (status, _, body) = badge_for(unread).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 0 }));
}

#[rstest]
#[actix_web::test]
async fn anonymous_callers_see_zero_without_a_lookup() {
    let mut ports = fixture_ports();
    ports.unread = aggregator(
        legacy_probe(),
        StaticPropertyUnreadRepository::legacy(profile(), 9),
        vec![StaticCommunityUnreadSource::count("user_messages", 9)],
    );
    let app = init_app(ports).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/messages/unread-count")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "count": 0 }));
}
