//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, NotificationsCommand, NotificationsQuery, UnreadCountQuery,
};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub unread: Arc<dyn UnreadCountQuery>,
    pub notifications: Arc<dyn NotificationsQuery>,
    pub notifications_command: Arc<dyn NotificationsCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub unread: Arc<dyn UnreadCountQuery>,
    pub notifications: Arc<dyn NotificationsQuery>,
    pub notifications_command: Arc<dyn NotificationsCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use arrienda_backend::domain::ports::{
    ///     FixtureLoginService, FixtureNotificationsCommand, FixtureNotificationsQuery,
    ///     FixtureUnreadCountQuery,
    /// };
    /// use arrienda_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     unread: Arc::new(FixtureUnreadCountQuery),
    ///     notifications: Arc::new(FixtureNotificationsQuery),
    ///     notifications_command: Arc::new(FixtureNotificationsCommand),
    /// });
    /// let _unread = state.unread.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            unread,
            notifications,
            notifications_command,
        } = ports;
        Self {
            login,
            unread,
            notifications,
            notifications_command,
        }
    }
}
