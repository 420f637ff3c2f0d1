//! User identity primitives.
//!
//! Users are owned by the external auth provider; this service only sees the
//! provider-issued UUID stored in the session. Legacy conversation tables key
//! participants by a separate profile identifier, modelled as [`ProfileId`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The profile identifier was blank.
    #[error("profile id must not be empty")]
    EmptyProfileId,
}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use arrienda_backend::domain::UserId;
///
/// let id = UserId::new("123e4567-e89b-12d3-a456-426614174000").unwrap();
/// assert_eq!(id.as_ref(), "123e4567-e89b-12d3-a456-426614174000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Opaque profile identifier used by the legacy conversation layout.
///
/// Legacy rows were keyed by generated string ids rather than auth UUIDs, so
/// no format is assumed beyond being non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileId(String);

impl ProfileId {
    /// Validate and wrap a profile identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyProfileId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ProfileId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    #[case(" 123e4567-e89b-12d3-a456-426614174000", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    fn user_id_serde_round_trips_as_string() {
        let id = UserId::random();
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, format!("\"{id}\""));
        let back: UserId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }

    #[rstest]
    fn from_uuid_matches_parsed_form() {
        let uuid = Uuid::new_v4();
        let parsed = UserId::new(uuid.to_string()).expect("valid");
        assert_eq!(UserId::from_uuid(uuid), parsed);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn profile_id_rejects_blank(#[case] raw: &str) {
        assert_eq!(
            ProfileId::new(raw).expect_err("blank"),
            UserValidationError::EmptyProfileId
        );
    }

    #[rstest]
    fn profile_id_keeps_opaque_value() {
        let id = ProfileId::new("ckv9x0abc0000qz3l").expect("valid");
        assert_eq!(id.as_ref(), "ckv9x0abc0000qz3l");
    }
}
