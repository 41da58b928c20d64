//! Driving ports for account registration, lookup, and removal.
//!
//! Inbound adapters depend on these traits only; the domain service behind
//! them owns candidate derivation and conflict resolution.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Error};

/// Raw registration input as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: String,
    pub phone: String,
    pub position: Option<String>,
}

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistration: Send + Sync {
    /// Register a new account, deriving a unique username and email.
    async fn register(&self, request: RegistrationRequest) -> Result<Account, Error>;
}

/// Domain use-case port for reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, Error>;

    /// Fetch an account by its derived username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, Error>;

    /// List every registered account.
    async fn list_accounts(&self) -> Result<Vec<Account>, Error>;
}

/// Domain use-case port for removing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRemoval: Send + Sync {
    /// Remove an account; fails with `NotFound` when it does not exist.
    async fn remove(&self, id: &AccountId) -> Result<(), Error>;
}
