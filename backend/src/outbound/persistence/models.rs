//! Internal Diesel row structs for the accounts table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::accounts;

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub username: String,
    pub email: String,
    pub position: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for committing a new account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub phone: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub position: Option<&'a str>,
    pub role: &'a str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
