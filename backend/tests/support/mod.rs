//! Shared HTTP harness for the integration suites.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use arrienda_backend::Trace;
use arrienda_backend::domain::ports::{
    FixtureLoginService, FixtureNotificationsCommand, FixtureNotificationsQuery,
    FixtureUnreadCountQuery,
};
use arrienda_backend::inbound::http::auth::login;
use arrienda_backend::inbound::http::error::{
    json_error_handler, path_error_handler, query_error_handler,
};
use arrienda_backend::inbound::http::messages::unread_count;
use arrienda_backend::inbound::http::notifications::{
    create_notification, get_preferences, list_notifications, mark_all_read, mark_read,
    unread_notification_count, update_preferences,
};
use arrienda_backend::inbound::http::state::{HttpState, HttpStatePorts};

/// Ports backed entirely by fixtures; suites replace what they exercise.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        unread: Arc::new(FixtureUnreadCountQuery),
        notifications: Arc::new(FixtureNotificationsQuery),
        notifications_command: Arc::new(FixtureNotificationsCommand),
    }
}

/// Initialise the `/api` scope the way the server does.
pub async fn init_app(
    ports: HttpStatePorts,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::new(ports)))
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .wrap(session)
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                    .app_data(web::PathConfig::default().error_handler(path_error_handler))
                    .service(login)
                    .service(unread_count)
                    .service(list_notifications)
                    .service(create_notification)
                    .service(unread_notification_count)
                    .service(mark_all_read)
                    .service(get_preferences)
                    .service(update_preferences)
                    .service(mark_read),
            ),
    )
    .await
}

/// Log in with the development credentials and return the session cookie.
pub async fn login_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "username": "admin", "password": "password" }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
