//! Account registration backend.
//!
//! Derives unique usernames and email addresses from display names and
//! commits accounts under storage-enforced uniqueness of phone, username, and
//! email.

pub mod domain;
pub mod inbound;
pub mod outbound;
