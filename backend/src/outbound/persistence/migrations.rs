//! Embedded schema migrations applied at startup.
//!
//! `diesel_migrations` only drives synchronous connections, so the harness
//! runs on a blocking thread with a dedicated `PgConnection`.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled in from `backend/migrations`.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures raised while bringing the schema up to date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    #[error("migration task aborted: {message}")]
    Aborted { message: String },
}

/// Apply every pending migration, returning how many ran.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a migration
/// fails; already applied migrations are left in place.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn =
            PgConnection::establish(&database_url).map_err(|err| MigrationError::Connect {
                message: err.to_string(),
            })?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        for version in &applied {
            info!(%version, "applied migration");
        }
        Ok(applied.len())
    })
    .await
    .map_err(|err| MigrationError::Aborted {
        message: err.to_string(),
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::migration::MigrationSource;
    use diesel::pg::Pg;
    use rstest::rstest;

    #[rstest]
    fn accounts_migration_is_embedded() {
        let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS)
            .expect("embedded migrations load");
        let names: Vec<String> = migrations
            .iter()
            .map(|migration| migration.name().to_string())
            .collect();

        assert!(
            names.iter().any(|name| name.ends_with("create_accounts")),
            "missing accounts migration in {names:?}"
        );
    }

    #[rstest]
    #[case("username")]
    #[case("email")]
    fn derived_identifier_columns_are_unbounded(#[case] column: &str) {
        let up_sql = include_str!("../../../migrations/2025-06-01-000000_create_accounts/up.sql");
        let definition = up_sql
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with(&format!("{column} ")))
            .expect("column is defined");

        // `FullName` allows a 255-character base, and suffixes extend it.
        assert_eq!(definition, format!("{column} TEXT NOT NULL,"));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_database_is_a_connect_error() {
        let err = run_pending_migrations("postgres://nobody@127.0.0.1:1/none")
            .await
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, MigrationError::Connect { .. }), "{err:?}");
    }
}
