//! Driven port for inspecting which conversation tables exist.
//!
//! Probes answer existence questions only; interpreting the answers is the job
//! of [`SchemaProbeReport::decide`](crate::domain::SchemaProbeReport::decide).

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while probing the messaging schema.
    pub enum MessagingSchemaProbeError {
        /// Database connection could not be obtained.
        Connection { message: String } => "schema probe connection failed: {message}",
        /// Probe query failed.
        Query { message: String } => "schema probe query failed: {message}",
    }
}

/// Existence probes against the live database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingSchemaProbe: Send + Sync {
    /// Whether a legacy `"UserProfile"` row references the user.
    ///
    /// A missing profile table is reported as `Ok(false)`.
    async fn has_user_profile(&self, user_id: &UserId) -> Result<bool, MessagingSchemaProbeError>;

    /// Column names of `table` in the `public` schema, or `None` when the
    /// table does not exist.
    async fn table_columns(
        &self,
        table: &str,
    ) -> Result<Option<Vec<String>>, MessagingSchemaProbeError>;
}

/// Probe for a database with no messaging tables at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessagingSchemaProbe;

#[async_trait]
impl MessagingSchemaProbe for FixtureMessagingSchemaProbe {
    async fn has_user_profile(&self, _user_id: &UserId) -> Result<bool, MessagingSchemaProbeError> {
        Ok(false)
    }

    async fn table_columns(
        &self,
        _table: &str,
    ) -> Result<Option<Vec<String>>, MessagingSchemaProbeError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_reports_nothing() {
        let probe = FixtureMessagingSchemaProbe;
        assert!(!probe.has_user_profile(&UserId::random()).await.expect("probe"));
        assert!(probe.table_columns("conversations").await.expect("probe").is_none());
    }

    #[test]
    fn errors_format_with_context() {
        let err = MessagingSchemaProbeError::query("relation missing");
        assert_eq!(err.to_string(), "schema probe query failed: relation missing");
    }
}
