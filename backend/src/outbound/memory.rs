//! In-memory `AccountRepository` adapter.
//!
//! Used when no database is configured and by concurrency tests. Each
//! operation runs entirely under one mutex acquisition, so `insert` checks all
//! three unique keys and commits atomically, matching the contract of the
//! PostgreSQL adapter. The lock is never held across an `.await`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, AccountLookup, ConflictFields, UniqueField};

/// Process-local account store enforcing unique `phone`, `username`, `email`.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccountRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Account>>, AccountRepositoryError> {
        self.accounts
            .lock()
            .map_err(|_| AccountRepositoryError::query("in-memory account store poisoned"))
    }
}

fn matches_lookup(account: &Account, lookup: &AccountLookup) -> bool {
    match lookup {
        AccountLookup::Phone(phone) => account.phone == *phone,
        AccountLookup::Username(username) => account.username == *username,
        AccountLookup::Email(email) => account.email == *email,
    }
}

fn collisions(existing: &[Account], candidate: &Account) -> ConflictFields {
    let mut fields = ConflictFields::default();
    for account in existing {
        if account.phone == candidate.phone {
            fields.insert(UniqueField::Phone);
        }
        if account.username == candidate.username {
            fields.insert(UniqueField::Username);
        }
        if account.email == candidate.email {
            fields.insert(UniqueField::Email);
        }
    }
    fields
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_field(
        &self,
        lookup: &AccountLookup,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let accounts = self.lock()?;
        Ok(accounts
            .iter()
            .find(|account| matches_lookup(account, lookup))
            .cloned())
    }

    async fn insert(&self, account: &Account) -> Result<Account, AccountRepositoryError> {
        let mut accounts = self.lock()?;
        let fields = collisions(&accounts, account);
        if !fields.is_empty() {
            return Err(AccountRepositoryError::conflict(
                fields,
                "duplicate key in in-memory store",
            ));
        }
        accounts.push(account.clone());
        Ok(account.clone())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let accounts = self.lock()?;
        Ok(accounts.iter().find(|account| account.id == *id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        Ok(self.lock()?.clone())
    }

    async fn delete_by_id(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        let mut accounts = self.lock()?;
        let before = accounts.len();
        accounts.retain(|account| account.id != *id);
        Ok(accounts.len() != before)
    }

    async fn delete_by_field(&self, lookup: &AccountLookup) -> Result<u64, AccountRepositoryError> {
        let mut accounts = self.lock()?;
        let before = accounts.len();
        accounts.retain(|account| !matches_lookup(account, lookup));
        Ok((before - accounts.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candidate, FullName, PhoneNumber};
    use rstest::{fixture, rstest};

    fn account(phone: &str, username: &str) -> Account {
        Account::register(
            FullName::new("Test Account").expect("name"),
            PhoneNumber::new(phone).expect("phone"),
            None,
            Candidate::new(username, "edulive.net"),
        )
    }

    #[fixture]
    fn repo() -> InMemoryAccountRepository {
        InMemoryAccountRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_then_lookup_by_each_unique_field(repo: InMemoryAccountRepository) {
        let stored = repo
            .insert(&account("0123456789", "accountt"))
            .await
            .expect("insert");

        let lookups = [
            AccountLookup::Phone(PhoneNumber::new("0123456789").expect("phone")),
            AccountLookup::Username("accountt".to_owned()),
            AccountLookup::Email("accountt@edulive.net".to_owned()),
        ];
        for lookup in lookups {
            let found = repo.find_by_field(&lookup).await.expect("lookup");
            assert_eq!(found.as_ref(), Some(&stored), "lookup {lookup:?}");
        }
        assert_eq!(repo.find_by_id(&stored.id).await.expect("by id"), Some(stored));
    }

    #[rstest]
    #[case("0123456789", "other", &[UniqueField::Phone])]
    #[case("0999999999", "accountt", &[UniqueField::Username, UniqueField::Email])]
    #[case(
        "0123456789",
        "accountt",
        &[UniqueField::Phone, UniqueField::Username, UniqueField::Email]
    )]
    #[tokio::test]
    async fn insert_reports_every_colliding_field(
        repo: InMemoryAccountRepository,
        #[case] phone: &str,
        #[case] username: &str,
        #[case] expected: &[UniqueField],
    ) {
        repo.insert(&account("0123456789", "accountt"))
            .await
            .expect("first insert");

        let err = repo
            .insert(&account(phone, username))
            .await
            .expect_err("duplicate rejected");
        let fields = match err {
            AccountRepositoryError::Conflict { fields, .. } => fields,
            other => panic!("expected conflict, got {other:?}"),
        };
        let expected: ConflictFields = expected.iter().copied().collect();
        assert_eq!(fields, expected);
        assert_eq!(repo.list_all().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn deletes_report_what_was_removed(repo: InMemoryAccountRepository) {
        let first = repo
            .insert(&account("0123456789", "first"))
            .await
            .expect("insert first");
        repo.insert(&account("0987654321", "second"))
            .await
            .expect("insert second");

        assert!(repo.delete_by_id(&first.id).await.expect("delete"));
        assert!(!repo.delete_by_id(&first.id).await.expect("delete again"));

        let removed = repo
            .delete_by_field(&AccountLookup::Username("second".to_owned()))
            .await
            .expect("delete by field");
        assert_eq!(removed, 1);
        assert!(repo.list_all().await.expect("list").is_empty());
    }
}
