//! Backend entry-point: loads settings, wires adapters and serves the API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use arrienda_backend::config::AppSettings;
use arrienda_backend::domain::unread_rpc_enabled;
use arrienda_backend::inbound::http::health::HealthState;
use arrienda_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use arrienda_backend::outbound::persistence::{DbPool, PoolConfig};
use server::{ServerConfig, create_server};

/// Layer `ARRIENDA_*` variables, config files and `args` into settings.
fn load_settings<I>(args: I) -> std::io::Result<AppSettings>
where
    I: IntoIterator<Item = OsString>,
{
    AppSettings::load_from_iter(args).map_err(|e| std::io::Error::other(e.to_string()))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
    )
    .with_schema_cache_ttl(settings.schema_cache_ttl())
    .with_unread_rpc(unread_rpc_enabled(&env))
    .with_fixture_login(settings.fixture_login());

    match settings.database_url() {
        Some(url) => {
            let pool_config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
            let pool = DbPool::new(pool_config)
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("ARRIENDA_DATABASE_URL not set; serving fixture data"),
    }

    info!(bind_addr = %settings.bind_addr(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;

    #[rstest]
    fn settings_load_through_ortho_config() {
        let _guard = lock_env([
            ("ARRIENDA_BIND_ADDR", Some("127.0.0.1:9191".to_owned())),
            ("ARRIENDA_DATABASE_URL", None),
            ("ARRIENDA_DB_MAX_CONNECTIONS", None),
            ("ARRIENDA_SCHEMA_CACHE_TTL_SECS", None),
            ("ARRIENDA_FIXTURE_LOGIN", None),
        ]);

        let settings =
            load_settings([OsString::from("arrienda-backend")]).expect("settings load");

        assert_eq!(settings.bind_addr().port(), 9191);
        assert_eq!(settings.database_url(), None);
    }
}
