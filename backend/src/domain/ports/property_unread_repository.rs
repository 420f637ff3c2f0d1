//! Driven port for unread counts in property conversations.
//!
//! One method per layout. The aggregator picks which one to call from the
//! detected [`SchemaVariant`](crate::domain::SchemaVariant); adapters never
//! guess the layout themselves.

use async_trait::async_trait;

use crate::domain::{LegacyLayout, ProfileId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by property unread adapters.
    pub enum PropertyUnreadRepositoryError {
        /// Database connection could not be obtained.
        Connection { message: String } =>
            "property unread repository connection failed: {message}",
        /// Count query failed.
        Query { message: String } =>
            "property unread repository query failed: {message}",
    }
}

/// Unread message counts for property conversations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyUnreadRepository: Send + Sync {
    /// Resolve the legacy profile id for a user, if one exists.
    async fn find_profile_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProfileId>, PropertyUnreadRepositoryError>;

    /// Count unread messages addressed to `profile_id` across its active
    /// legacy conversations.
    async fn count_legacy_unread(
        &self,
        profile_id: &ProfileId,
        layout: LegacyLayout,
    ) -> Result<i64, PropertyUnreadRepositoryError>;

    /// Count unread messages addressed to `user_id` in sender/receiver
    /// conversations.
    async fn count_modern_unread(
        &self,
        user_id: &UserId,
    ) -> Result<i64, PropertyUnreadRepositoryError>;
}

/// Repository with no profiles and no messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePropertyUnreadRepository;

#[async_trait]
impl PropertyUnreadRepository for FixturePropertyUnreadRepository {
    async fn find_profile_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<ProfileId>, PropertyUnreadRepositoryError> {
        Ok(None)
    }

    async fn count_legacy_unread(
        &self,
        _profile_id: &ProfileId,
        _layout: LegacyLayout,
    ) -> Result<i64, PropertyUnreadRepositoryError> {
        Ok(0)
    }

    async fn count_modern_unread(
        &self,
        _user_id: &UserId,
    ) -> Result<i64, PropertyUnreadRepositoryError> {
        Ok(0)
    }
}
