//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) are internal;
//! the domain only sees [`DieselAccountRepository`] through the
//! `AccountRepository` port.
//!
//! ```no_run
//! use registration::outbound::persistence::{
//!     DbPool, DieselAccountRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/accounts";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let repository = DieselAccountRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod unique_violation;

pub use diesel_account_repository::DieselAccountRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
