//! Builders wiring domain services to PostgreSQL adapters or fixtures.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use arrienda_backend::domain::ports::{
    CommunityUnreadSource, DisabledLoginService, FixtureLoginService,
    FixtureNotificationsCommand, FixtureNotificationsQuery, FixtureUnreadCountQuery,
    LoginService, MessagingSchemaDetector, NotificationsCommand, NotificationsQuery,
    UnreadCountQuery,
};
use arrienda_backend::domain::{
    NotificationService, SchemaDetectionService, UnreadAggregatorService,
};
use arrienda_backend::inbound::http::session_config::BuildMode;
use arrienda_backend::inbound::http::state::{HttpState, HttpStatePorts};
use arrienda_backend::outbound::persistence::{
    CommunityConversationsUnreadSource, DbPool, DieselNotificationPreferencesRepository,
    DieselNotificationRepository, DieselPropertyUnreadRepository, PostgresMessagingSchemaProbe,
    RpcCommunityUnreadSource, UserMessagesUnreadSource,
};

use super::ServerConfig;

/// Community strategies in the order they are tried.
fn community_sources(pool: &DbPool, unread_rpc: bool) -> Vec<Arc<dyn CommunityUnreadSource>> {
    let mut sources: Vec<Arc<dyn CommunityUnreadSource>> = Vec::with_capacity(3);
    if unread_rpc {
        sources.push(Arc::new(RpcCommunityUnreadSource::new(pool.clone())));
    }
    sources.push(Arc::new(UserMessagesUnreadSource::new(pool.clone())));
    sources.push(Arc::new(CommunityConversationsUnreadSource::new(pool.clone())));
    sources
}

fn build_unread_query(
    config: &ServerConfig,
    clock: &Arc<dyn Clock>,
) -> Arc<dyn UnreadCountQuery> {
    let Some(pool) = &config.db_pool else {
        return Arc::new(FixtureUnreadCountQuery);
    };

    let detector: Arc<dyn MessagingSchemaDetector> = Arc::new(SchemaDetectionService::new(
        Arc::new(PostgresMessagingSchemaProbe::new(pool.clone())),
        clock.clone(),
        config.schema_cache_ttl,
    ));
    let sources = community_sources(pool, config.unread_rpc);
    info!(
        strategies = ?sources.iter().map(|source| source.name()).collect::<Vec<_>>(),
        "community unread strategies configured"
    );

    Arc::new(UnreadAggregatorService::new(
        detector,
        Arc::new(DieselPropertyUnreadRepository::new(pool.clone())),
        sources,
    ))
}

fn build_notifications_pair(
    config: &ServerConfig,
    clock: &Arc<dyn Clock>,
) -> (Arc<dyn NotificationsCommand>, Arc<dyn NotificationsQuery>) {
    match &config.db_pool {
        Some(pool) => {
            let service = Arc::new(NotificationService::new(
                Arc::new(DieselNotificationRepository::new(pool.clone())),
                Arc::new(DieselNotificationPreferencesRepository::new(pool.clone())),
                clock.clone(),
            ));
            (
                service.clone() as Arc<dyn NotificationsCommand>,
                service as Arc<dyn NotificationsQuery>,
            )
        }
        None => (
            Arc::new(FixtureNotificationsCommand),
            Arc::new(FixtureNotificationsQuery),
        ),
    }
}

/// The development login only runs on fixtures, or against a database in a
/// debug build that asked for it.
fn build_login_service(config: &ServerConfig, mode: BuildMode) -> Arc<dyn LoginService> {
    let allowed = config.db_pool.is_none() || (config.fixture_login && mode.is_debug());
    if allowed {
        if config.db_pool.is_some() {
            warn!("development login enabled against a database");
        }
        Arc::new(FixtureLoginService)
    } else {
        Arc::new(DisabledLoginService)
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let unread = build_unread_query(config, &clock);
    let (notifications_command, notifications) = build_notifications_pair(config, &clock);

    web::Data::new(HttpState::new(HttpStatePorts {
        login: build_login_service(config, BuildMode::from_debug_assertions()),
        unread,
        notifications,
        notifications_command,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use arrienda_backend::domain::{ErrorCode, LoginCredentials, UserId};
    use arrienda_backend::outbound::persistence::PoolConfig;
    use rstest::rstest;

    fn config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("socket address"),
        )
    }

    /// A pool with no idle connections never dials the server.
    async fn lazy_pool() -> DbPool {
        let config =
            PoolConfig::new("postgres://arrienda@127.0.0.1:1/arrienda").with_min_idle(None);
        DbPool::new(config).await.expect("lazy pool builds")
    }

    #[rstest]
    #[case::fixtures_in_release(false, false, BuildMode::Release, true)]
    #[case::pool_in_release(true, false, BuildMode::Release, false)]
    #[case::pool_in_release_even_if_asked(true, true, BuildMode::Release, false)]
    #[case::pool_in_debug_without_opt_in(true, false, BuildMode::Debug, false)]
    #[case::pool_in_debug_with_opt_in(true, true, BuildMode::Debug, true)]
    #[tokio::test]
    async fn development_login_is_confined_to_fixtures_and_opted_in_debug(
        #[case] with_pool: bool,
        #[case] fixture_login: bool,
        #[case] mode: BuildMode,
        #[case] accepted: bool,
    ) {
        let mut config = config().with_fixture_login(fixture_login);
        if with_pool {
            config = config.with_db_pool(lazy_pool().await);
        }
        let creds = LoginCredentials::try_from_parts("admin", "password").expect("shape");

        let result = build_login_service(&config, mode).authenticate(&creds).await;

        if accepted {
            assert!(result.is_ok());
        } else {
            let err = result.expect_err("development credentials rejected");
            assert_eq!(err.code(), ErrorCode::Unauthorized);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixtures_are_used_without_a_database() {
        let config = config();

        let state = build_http_state(&config);

        let user = UserId::random();
        assert_eq!(state.unread.unread_count(&user).await.total(), 0);
        assert_eq!(state.notifications.count_unread(&user).await, 0);
    }
}
