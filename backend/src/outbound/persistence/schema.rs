//! Diesel table definitions for the accounts schema.
//!
//! Must mirror `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after editing a migration.

diesel::table! {
    /// Registered accounts.
    ///
    /// `phone`, `username`, and `email` each carry a unique constraint named
    /// `accounts_<column>_key`; violation classification relies on that
    /// naming.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name as submitted (trimmed).
        name -> Varchar,
        /// Ten-digit phone number.
        phone -> Varchar,
        /// Derived username, `[a-z0-9]+`. Unbounded: suffixes may extend a
        /// maximal base.
        username -> Text,
        /// `username@<domain>`.
        email -> Text,
        /// Optional job position.
        position -> Nullable<Varchar>,
        /// `user`, `admin`, or `super_admin`.
        role -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}
