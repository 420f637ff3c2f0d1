//! Cookie session access for HTTP handlers.
//!
//! [`SessionContext`] wraps the Actix session so handlers deal in [`UserId`]
//! rather than raw cookie values. Two read modes exist:
//! [`SessionContext::require_user_id`] for endpoints that answer `401`, and
//! [`SessionContext::optional_user_id`] for badge-style endpoints that treat
//! any session problem as "anonymous".

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Handler-facing view of the session cookie.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `user_id` in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the session entirely.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Current user id. A tampered or non-UUID value reads as no user.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match UserId::new(&value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "ignoring malformed user id in session cookie");
                None
            }
        }))
    }

    /// Current user id or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Current user id, swallowing session read failures.
    pub fn optional_user_id(&self) -> Option<UserId> {
        match self.user_id() {
            Ok(id) => id,
            Err(error) => {
                warn!(message = error.message(), "session unreadable; treating as anonymous");
                None
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
