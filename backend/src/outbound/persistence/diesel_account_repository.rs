//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Uniqueness of `phone`, `username`, and `email` is enforced by the table's
//! unique constraints. A rejected insert is reported as
//! [`AccountRepositoryError::Conflict`] carrying every field the violation
//! could be attributed to.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{
    Account, AccountId, AccountLookup, AccountValidationError, FullName, PhoneNumber, Position,
    Role,
};

use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;
use super::unique_violation::classify_conflict;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to account repository errors.
fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            AccountRepositoryError::conflict(classify_conflict(info.as_ref()), info.message())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => AccountRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => AccountRepositoryError::query("database query error"),
        _ => AccountRepositoryError::query("database error"),
    }
}

fn corrupt_row(id: uuid::Uuid, error: AccountValidationError) -> AccountRepositoryError {
    warn!(account_id = %id, %error, "stored account failed validation");
    AccountRepositoryError::query(format!("stored account {id} is invalid: {error}"))
}

/// Convert a database row into a domain account.
fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let id = row.id;
    let name = FullName::new(&row.name).map_err(|err| corrupt_row(id, err))?;
    let phone = PhoneNumber::new(&row.phone).map_err(|err| corrupt_row(id, err))?;
    let position = row
        .position
        .as_deref()
        .map(Position::new)
        .transpose()
        .map_err(|err| corrupt_row(id, err))?;
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| corrupt_row(id, err))?;

    Ok(Account {
        id: AccountId::from_uuid(id),
        name,
        phone,
        username: row.username,
        email: row.email,
        position,
        role,
        is_active: row.is_active,
        created_at: row.created_at,
    })
}

fn rows_to_accounts(rows: Vec<AccountRow>) -> Result<Vec<Account>, AccountRepositoryError> {
    rows.into_iter().map(row_to_account).collect()
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_field(
        &self,
        lookup: &AccountLookup,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let query = accounts::table.select(AccountRow::as_select()).into_boxed();
        let query = match lookup {
            AccountLookup::Phone(phone) => {
                query.filter(accounts::phone.eq(AsRef::<str>::as_ref(phone)))
            }
            AccountLookup::Username(username) => {
                query.filter(accounts::username.eq(username.as_str()))
            }
            AccountLookup::Email(email) => query.filter(accounts::email.eq(email.as_str())),
        };

        let row = query
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn insert(&self, account: &Account) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAccountRow {
            id: *account.id.as_uuid(),
            name: account.name.as_ref(),
            phone: account.phone.as_ref(),
            username: &account.username,
            email: &account.email,
            position: account.position.as_ref().map(|position| position.as_ref()),
            role: account.role.as_str(),
            is_active: account.is_active,
            created_at: account.created_at,
        };

        let row = diesel::insert_into(accounts::table)
            .values(&new_row)
            .returning(AccountRow::as_returning())
            .get_result::<AccountRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_account(row)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = accounts::table
            .filter(accounts::id.eq(*id.as_uuid()))
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = accounts::table
            .select(AccountRow::as_select())
            .order((accounts::created_at.asc(), accounts::id.asc()))
            .load::<AccountRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_accounts(rows)
    }

    async fn delete_by_id(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(accounts::table.filter(accounts::id.eq(*id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn delete_by_field(&self, lookup: &AccountLookup) -> Result<u64, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = match lookup {
            AccountLookup::Phone(phone) => {
                let phone: &str = phone.as_ref();
                diesel::delete(accounts::table.filter(accounts::phone.eq(phone)))
                    .execute(&mut conn)
                    .await
            }
            AccountLookup::Username(username) => {
                diesel::delete(accounts::table.filter(accounts::username.eq(username.as_str())))
                    .execute(&mut conn)
                    .await
            }
            AccountLookup::Email(email) => {
                diesel::delete(accounts::table.filter(accounts::email.eq(email.as_str())))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping and row conversion coverage; queries run against a live
    //! database are outside unit scope.
    use super::*;
    use crate::domain::UniqueField;
    use chrono::Utc;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::{fixture, rstest};

    struct UniqueViolationInfo(&'static str, &'static str);

    impl DatabaseErrorInformation for UniqueViolationInfo {
        fn message(&self) -> &str {
            self.0
        }

        fn details(&self) -> Option<&str> {
            Some(self.1)
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("accounts")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            None
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[fixture]
    fn row() -> AccountRow {
        AccountRow {
            id: uuid::Uuid::new_v4(),
            name: "Nguyen Ngoc Quyet".to_owned(),
            phone: "0123456789".to_owned(),
            username: "quyetnn".to_owned(),
            email: "quyetnn@edulive.net".to_owned(),
            position: Some("Teacher".to_owned()),
            role: "admin".to_owned(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn unique_violation_maps_to_conflict_with_fields() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(UniqueViolationInfo(
                "duplicate key value violates unique constraint \"accounts_username_key\"",
                "Key (username)=(quyetnn) already exists.",
            )),
        );

        match map_diesel_error(error) {
            AccountRepositoryError::Conflict { fields, message } => {
                assert_eq!(fields, [UniqueField::Username].into_iter().collect());
                assert!(message.contains("accounts_username_key"));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[rstest]
    #[case::closed(
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new(UniqueViolationInfo("server closed the connection", "")),
        ),
        AccountRepositoryError::connection("database connection error")
    )]
    #[case::not_found(DieselError::NotFound, AccountRepositoryError::query("record not found"))]
    #[case::rollback(DieselError::RollbackTransaction, AccountRepositoryError::query("database error"))]
    fn other_diesel_errors_map_to_port_errors(
        #[case] error: DieselError,
        #[case] expected: AccountRepositoryError,
    ) {
        assert_eq!(map_diesel_error(error), expected);
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        assert_eq!(
            map_pool_error(PoolError::checkout("timed out")),
            AccountRepositoryError::connection("timed out")
        );
    }

    #[rstest]
    fn row_converts_to_account(row: AccountRow) {
        let id = row.id;
        let account = row_to_account(row).expect("valid row converts");

        assert_eq!(account.id, AccountId::from_uuid(id));
        assert_eq!(account.role, Role::Admin);
        assert_eq!(account.phone.to_string(), "0123456789");
        assert_eq!(
            account.position.map(String::from).as_deref(),
            Some("Teacher")
        );
    }

    #[rstest]
    #[case::phone(|row: &mut AccountRow| row.phone = "12345".to_owned())]
    #[case::role(|row: &mut AccountRow| row.role = "root".to_owned())]
    #[case::position(|row: &mut AccountRow| row.position = Some("x".to_owned()))]
    fn corrupt_rows_are_query_errors(mut row: AccountRow, #[case] corrupt: fn(&mut AccountRow)) {
        corrupt(&mut row);
        let err = row_to_account(row).expect_err("corrupt row must be rejected");
        assert!(matches!(err, AccountRepositoryError::Query { .. }));
    }
}
