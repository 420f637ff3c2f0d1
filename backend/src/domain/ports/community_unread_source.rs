//! Driven port for one community unread strategy.
//!
//! Community messaging has shipped three storage shapes. Each is an
//! independent source; the aggregator walks an ordered list of them and keeps
//! the first answer.

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by a community unread source.
    pub enum CommunityUnreadSourceError {
        /// Database connection could not be obtained.
        Connection { message: String } =>
            "community unread source connection failed: {message}",
        /// The backing table or function is missing or the query failed.
        Query { message: String } =>
            "community unread source query failed: {message}",
    }
}

/// One strategy for counting unread community messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityUnreadSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Unread community messages addressed to the user.
    async fn count_unread(&self, user_id: &UserId) -> Result<i64, CommunityUnreadSourceError>;
}
