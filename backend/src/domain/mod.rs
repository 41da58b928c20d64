//! Domain primitives, services, and ports.
//!
//! Purpose: own account identity rules and the registration algorithm
//! independently of HTTP and storage. Adapters reach the domain only through
//! [`ports`].
//!
//! Public surface:
//! - Account (alias to `account::Account`) plus its value objects.
//! - normalize / derive_candidate: pure username and email derivation.
//! - ConflictFields / UniqueField: which unique key(s) an insert hit.
//! - AccountRegistrationService: uniqueness resolver behind the driving ports.
//! - Error / ErrorCode: transport-agnostic error payload.

pub mod account;
pub mod conflict;
pub mod error;
pub mod identifier;
pub mod ports;
pub mod registration_service;

pub use self::account::{
    Account, AccountId, AccountLookup, AccountValidationError, FullName, PhoneNumber, Position,
    Role,
};
pub use self::conflict::{ConflictFields, UniqueField};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifier::{Candidate, CandidateError, derive_candidate, normalize};
pub use self::registration_service::{
    AccountRegistrationService, DEFAULT_EMAIL_DOMAIN, DEFAULT_MAX_ATTEMPTS, RegistrationError,
    RegistrationPolicy,
};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use registration::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("missing"))
/// }
/// ```
pub type DomainResult<T> = Result<T, Error>;
