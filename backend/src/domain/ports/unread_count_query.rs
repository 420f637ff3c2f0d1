//! Driving port behind `GET /api/messages/unread-count`.

use async_trait::async_trait;

use crate::domain::{UnreadTotal, UserId};

/// Aggregate unread messages for a user.
///
/// Infallible by contract: a domain that cannot be read contributes zero.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnreadCountQuery: Send + Sync {
    /// Per-domain unread counts.
    async fn unread_count(&self, user_id: &UserId) -> UnreadTotal;
}

/// Query reporting nothing unread.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUnreadCountQuery;

#[async_trait]
impl UnreadCountQuery for FixtureUnreadCountQuery {
    async fn unread_count(&self, _user_id: &UserId) -> UnreadTotal {
        UnreadTotal::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_reports_zero() {
        let total = FixtureUnreadCountQuery.unread_count(&UserId::random()).await;
        assert_eq!(total.total(), 0);
    }
}
