//! Request-time detection of the live messaging layout.
//!
//! [`SchemaDetectionService`] gathers a [`SchemaProbeReport`] through a
//! [`MessagingSchemaProbe`] and applies [`SchemaProbeReport::decide`]. Probe
//! failures are logged and read as "not found"; detection itself never fails.
//!
//! Table shapes do not depend on the user, so they may be memoised for a short
//! TTL. The profile probe always runs. A probe round with any failure is not
//! cached, so a transient error never pins a wrong answer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::ports::{MessagingSchemaDetector, MessagingSchemaProbe};
use crate::domain::{
    ConversationTables, LEGACY_CONVERSATION_TABLE, MODERN_CONVERSATION_TABLE, SchemaDetection,
    SchemaProbeReport, TableShape, UserId,
};

#[derive(Debug, Clone)]
struct CachedTables {
    tables: ConversationTables,
    probed_at: DateTime<Utc>,
}

/// Schema detector backed by a probe and an optional shape cache.
pub struct SchemaDetectionService<P> {
    probe: Arc<P>,
    clock: Arc<dyn Clock>,
    ttl: Option<TimeDelta>,
    cache: RwLock<Option<CachedTables>>,
}

impl<P> SchemaDetectionService<P> {
    /// Create a detector. A zero `cache_ttl` probes table shapes on every call.
    pub fn new(probe: Arc<P>, clock: Arc<dyn Clock>, cache_ttl: Duration) -> Self {
        let ttl = if cache_ttl.is_zero() {
            None
        } else {
            TimeDelta::from_std(cache_ttl).ok()
        };
        Self {
            probe,
            clock,
            ttl,
            cache: RwLock::new(None),
        }
    }
}

impl<P> SchemaDetectionService<P>
where
    P: MessagingSchemaProbe,
{
    async fn has_profile(&self, user_id: &UserId) -> bool {
        match self.probe.has_user_profile(user_id).await {
            Ok(found) => found,
            Err(error) => {
                warn!(%error, "profile probe failed; treating as absent");
                false
            }
        }
    }

    /// Probe one table. The flag is `false` when the probe failed.
    async fn table_shape(&self, table: &str) -> (TableShape, bool) {
        match self.probe.table_columns(table).await {
            Ok(Some(columns)) => (TableShape::present(columns), true),
            Ok(None) => (TableShape::absent(), true),
            Err(error) => {
                warn!(table, %error, "table probe failed; treating as absent");
                (TableShape::absent(), false)
            }
        }
    }

    async fn cached_tables(&self, now: DateTime<Utc>) -> Option<ConversationTables> {
        let ttl = self.ttl?;
        let guard = self.cache.read().await;
        guard
            .as_ref()
            .filter(|cached| now.signed_duration_since(cached.probed_at) < ttl)
            .map(|cached| cached.tables.clone())
    }

    async fn conversation_tables(&self) -> ConversationTables {
        let now = self.clock.utc();
        if let Some(tables) = self.cached_tables(now).await {
            return tables;
        }

        let (legacy, legacy_ok) = self.table_shape(LEGACY_CONVERSATION_TABLE).await;
        let (modern, modern_ok) = self.table_shape(MODERN_CONVERSATION_TABLE).await;
        let tables = ConversationTables { legacy, modern };

        if self.ttl.is_some() && legacy_ok && modern_ok {
            *self.cache.write().await = Some(CachedTables {
                tables: tables.clone(),
                probed_at: now,
            });
        }
        tables
    }
}

#[async_trait]
impl<P> MessagingSchemaDetector for SchemaDetectionService<P>
where
    P: MessagingSchemaProbe,
{
    async fn detect(&self, user_id: &UserId) -> SchemaDetection {
        let has_profile = self.has_profile(user_id).await;
        let tables = self.conversation_tables().await;
        let detection = SchemaProbeReport {
            has_profile,
            tables,
        }
        .decide();
        debug!(
            variant = %detection.variant,
            reason = %detection.reason,
            "messaging schema detected"
        );
        detection
    }
}
