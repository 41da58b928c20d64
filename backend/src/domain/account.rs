//! Account data model.
//!
//! An [`Account`] is created exactly once by a successful registration and is
//! never updated in place. Storage enforces that `phone`, `username`, and
//! `email` are each unique across all accounts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identifier::Candidate;

/// Validation errors returned by the account value-object constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("account id must be a valid UUID")]
    InvalidId,
    #[error("phone number must be exactly {digits} digits")]
    InvalidPhone { digits: usize },
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("position must be between {min} and {max} characters")]
    PositionLength { min: usize, max: usize },
    #[error("unknown role: {value}")]
    UnknownRole { value: String },
}

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Validate and construct an [`AccountId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(AccountValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }

    /// Generate a new random [`AccountId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID, as read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Number of digits a phone number must contain.
pub const PHONE_DIGITS: usize = 10;

/// Ten-digit phone number. Unique across all accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and construct a [`PhoneNumber`]; surrounding whitespace is
    /// trimmed.
    pub fn new(phone: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let phone = phone.as_ref().trim();
        if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountValidationError::InvalidPhone {
                digits: PHONE_DIGITS,
            });
        }
        Ok(Self(phone.to_owned()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a full name.
pub const NAME_MAX: usize = 255;

/// Free-text full name as entered by the user.
///
/// Emptiness is not rejected here: whether a name carries enough material to
/// derive a username is decided by [`derive_candidate`](super::derive_candidate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a [`FullName`]; surrounding whitespace is
    /// trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let name = name.as_ref().trim();
        if name.chars().count() > NAME_MAX {
            return Err(AccountValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(name.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a position.
pub const POSITION_MIN: usize = 3;
/// Maximum allowed length for a position.
pub const POSITION_MAX: usize = 60;

/// Job position attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position(String);

impl Position {
    /// Validate and construct a [`Position`]; surrounding whitespace is
    /// trimmed before the length check.
    pub fn new(position: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let position = position.as_ref().trim();
        let length = position.chars().count();
        if !(POSITION_MIN..=POSITION_MAX).contains(&length) {
            return Err(AccountValidationError::PositionLength {
                min: POSITION_MIN,
                max: POSITION_MAX,
            });
        }
        Ok(Self(position.to_owned()))
    }
}

impl AsRef<str> for Position {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.0
    }
}

impl TryFrom<String> for Position {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authorisation tier recorded on an account. Registration always assigns
/// [`Role::User`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(AccountValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered account.
///
/// ## Invariants
/// - `email` is always `username@<domain>`.
/// - `phone`, `username`, and `email` are unique across committed accounts;
///   storage is the arbiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: FullName,
    pub phone: PhoneNumber,
    pub username: String,
    pub email: String,
    pub position: Option<Position>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh, active, user-role account claiming `candidate`.
    pub fn register(
        name: FullName,
        phone: PhoneNumber,
        position: Option<Position>,
        candidate: Candidate,
    ) -> Self {
        let Candidate { username, email } = candidate;
        Self {
            id: AccountId::random(),
            name,
            phone,
            username,
            email,
            position,
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Point lookup against one of the uniquely indexed account fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    Phone(PhoneNumber),
    Username(String),
    Email(String),
}
