//! Unread message aggregation across property and community messaging.
//!
//! Property conversations live under whichever layout the
//! [`MessagingSchemaDetector`] reports; the strategy is picked once per request
//! from the [`SchemaVariant`]. Community messaging is an ordered list of
//! [`CommunityUnreadSource`]s where the first successful answer wins.
//!
//! Nothing here fails: a domain that cannot be read contributes zero and the
//! failure is logged.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Env;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::ports::{
    CommunityUnreadSource, MessagingSchemaDetector, PropertyUnreadRepository,
    PropertyUnreadRepositoryError, UnreadCountQuery,
};
use crate::domain::{LegacyLayout, SchemaVariant, UserId};

/// Environment flag enabling the community unread RPC.
pub const UNREAD_RPC_FLAG: &str = "NEXT_PUBLIC_ENABLE_UNREAD_RPC";

/// Whether the community unread RPC should be attempted.
///
/// Accepts `1`, `true`, `yes` and `y` in any case; anything else, including an
/// unset variable, disables the RPC.
///
/// # Examples
/// ```
/// use arrienda_backend::domain::unread_rpc_enabled;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| Some("Yes".to_owned()));
/// assert!(unread_rpc_enabled(&env));
/// ```
pub fn unread_rpc_enabled<E: Env>(env: &E) -> bool {
    env.string(UNREAD_RPC_FLAG).is_some_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y"
        )
    })
}

/// Unread counts per messaging domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnreadTotal {
    /// Unread messages in property conversations.
    pub property: u64,
    /// Unread messages in community conversations.
    pub community: u64,
}

impl UnreadTotal {
    /// Combined count, saturating on overflow.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.property.saturating_add(self.community)
    }
}

/// Clamp a store-reported count to a non-negative value.
pub(crate) fn clamp_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Aggregator implementing [`UnreadCountQuery`].
pub struct UnreadAggregatorService<P> {
    detector: Arc<dyn MessagingSchemaDetector>,
    property: Arc<P>,
    community: Vec<Arc<dyn CommunityUnreadSource>>,
}

impl<P> UnreadAggregatorService<P> {
    /// Create an aggregator. `community` is tried in order.
    pub fn new(
        detector: Arc<dyn MessagingSchemaDetector>,
        property: Arc<P>,
        community: Vec<Arc<dyn CommunityUnreadSource>>,
    ) -> Self {
        Self {
            detector,
            property,
            community,
        }
    }
}

impl<P> UnreadAggregatorService<P>
where
    P: PropertyUnreadRepository,
{
    async fn legacy_unread(
        &self,
        user_id: &UserId,
        layout: LegacyLayout,
    ) -> Result<i64, PropertyUnreadRepositoryError> {
        let Some(profile_id) = self.property.find_profile_id(user_id).await? else {
            debug!("no legacy profile for user; property unread is zero");
            return Ok(0);
        };
        self.property.count_legacy_unread(&profile_id, layout).await
    }

    async fn property_unread(&self, user_id: &UserId) -> u64 {
        let detection = self.detector.detect(user_id).await;
        let result = match detection.variant {
            SchemaVariant::Prisma(layout) => self.legacy_unread(user_id, layout).await,
            SchemaVariant::Supabase => self.property.count_modern_unread(user_id).await,
            SchemaVariant::None => Ok(0),
        };
        match result {
            Ok(count) => clamp_count(count),
            Err(error) => {
                warn!(
                    variant = %detection.variant,
                    %error,
                    "property unread count failed; contributing zero"
                );
                0
            }
        }
    }

    async fn community_unread(&self, user_id: &UserId) -> u64 {
        for source in &self.community {
            match source.count_unread(user_id).await {
                Ok(count) => {
                    debug!(source = source.name(), count, "community unread resolved");
                    return clamp_count(count);
                }
                Err(error) => {
                    warn!(source = source.name(), %error, "community unread source failed");
                }
            }
        }
        0
    }
}

#[async_trait]
impl<P> UnreadCountQuery for UnreadAggregatorService<P>
where
    P: PropertyUnreadRepository,
{
    async fn unread_count(&self, user_id: &UserId) -> UnreadTotal {
        let total = UnreadTotal {
            property: self.property_unread(user_id).await,
            community: self.community_unread(user_id).await,
        };
        debug!(
            property = total.property,
            community = total.community,
            total = total.total(),
            "unread messages aggregated"
        );
        total
    }
}
