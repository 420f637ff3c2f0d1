//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{
    FixtureLoginService, FixtureNotificationsCommand, FixtureNotificationsQuery,
    FixtureUnreadCountQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Ports backed entirely by fixtures; tests overwrite the ones they exercise.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        unread: Arc::new(FixtureUnreadCountQuery),
        notifications: Arc::new(FixtureNotificationsQuery),
        notifications_command: Arc::new(FixtureNotificationsCommand),
    }
}

/// Convenience wrapper for [`fixture_ports`].
pub fn fixture_state() -> HttpState {
    HttpState::new(fixture_ports())
}
