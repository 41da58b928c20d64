//! Startup settings and the server configuration object built from them.

use std::io;
use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use registration::domain::{DEFAULT_EMAIL_DOMAIN, DEFAULT_MAX_ATTEMPTS, RegistrationPolicy};
use registration::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings loaded via OrthoConfig from CLI flags, `REGISTRATION_*`
/// environment variables, and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRATION")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
    /// PostgreSQL URL. Accounts are kept in memory when absent.
    pub database_url: Option<String>,
    /// Domain appended to derived usernames.
    #[ortho_config(default = String::from(DEFAULT_EMAIL_DOMAIN))]
    pub email_domain: String,
    /// Derive-probe-insert cycles before a registration gives up.
    #[ortho_config(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_POOL_MAX_SIZE)]
    pub pool_max_size: u32,
}

impl AppSettings {
    /// Parse the configured listen address.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        self.bind_addr.parse().map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address {:?}: {err}", self.bind_addr),
            )
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn registration_policy(&self) -> RegistrationPolicy {
        RegistrationPolicy::new(self.email_domain.as_str()).with_max_attempts(self.max_attempts)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policy: RegistrationPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, policy: RegistrationPolicy) -> Self {
        Self {
            bind_addr,
            policy,
            db_pool: None,
        }
    }

    /// Persist accounts in PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
