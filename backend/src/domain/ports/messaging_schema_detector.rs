//! Port for resolving the live messaging layout for a request.

use async_trait::async_trait;

use crate::domain::{SchemaDetection, UserId};

/// Resolve which conversation layout applies to `user_id`.
///
/// Detection never fails; unreadable facts count as "not found".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingSchemaDetector: Send + Sync {
    /// Detect the layout for this request.
    async fn detect(&self, user_id: &UserId) -> SchemaDetection;
}
