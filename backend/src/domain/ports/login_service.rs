//! Driving port for establishing a session.
//!
//! Identity belongs to the external auth provider. The HTTP adapter only needs
//! something that turns credentials into a [`UserId`]; tests and local runs use
//! [`FixtureLoginService`], deployments backed by PostgreSQL use
//! [`DisabledLoginService`].

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// User id issued by [`FixtureLoginService`].
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Authenticate credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the user id for valid credentials, `unauthorized` otherwise.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Development authenticator accepting `admin` / `password`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() != "admin" || credentials.password() != "password" {
            return Err(Error::unauthorized("invalid credentials"));
        }
        UserId::new(FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("fixture user id rejected: {err}")))
    }
}

/// Authenticator for deployments where sessions come from the identity
/// provider. Every credential is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLoginService;

#[async_trait]
impl LoginService for DisabledLoginService {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<UserId, Error> {
        Err(Error::unauthorized("password login is disabled"))
    }
}
