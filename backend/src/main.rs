//! Registration server entry point: loads settings, prepares storage, and
//! serves the account API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use registration::inbound::http::health::HealthState;
use registration::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("load configuration: {err}")))?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr, settings.registration_policy());

    if let Some(database_url) = settings.database_url() {
        let applied = run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
        info!(applied, "database schema is up to date");

        let pool_config = PoolConfig::new(database_url).with_max_size(settings.pool_max_size);
        let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    info!(
        %bind_addr,
        email_domain = %settings.email_domain,
        max_attempts = settings.max_attempts,
        "starting registration server"
    );
    create_server(web::Data::new(HealthState::new()), config)?.await
}
