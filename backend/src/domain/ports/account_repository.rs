//! Port abstraction for account storage adapters and their errors.
//!
//! The contract the registration resolver relies on:
//!
//! - point lookups by id and by any uniquely indexed field;
//! - an atomic insert that enforces uniqueness of `phone`, `username`, and
//!   `email`, and on failure reports *which* of them collided;
//! - deletes used by account removal, never by the creation path.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, AccountLookup, ConflictFields};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// Insert violated one or more unique constraints. `fields` is empty
        /// when the adapter could not tell which constraint fired.
        Conflict { fields: ConflictFields, message: String } => "account unique constraint violated on {fields}: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch the account owning the given unique field value.
    async fn find_by_field(
        &self,
        lookup: &AccountLookup,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Insert a new account, returning the stored record.
    ///
    /// Returns [`AccountRepositoryError::Conflict`] when any unique index
    /// rejects the row; nothing is persisted in that case.
    async fn insert(&self, account: &Account) -> Result<Account, AccountRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Return every stored account, oldest first.
    async fn list_all(&self) -> Result<Vec<Account>, AccountRepositoryError>;

    /// Delete by identifier, reporting whether a row was removed.
    async fn delete_by_id(&self, id: &AccountId) -> Result<bool, AccountRepositoryError>;

    /// Delete by unique field, returning the number of removed rows.
    async fn delete_by_field(&self, lookup: &AccountLookup) -> Result<u64, AccountRepositoryError>;
}
