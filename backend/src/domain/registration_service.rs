//! Account registration domain service.
//!
//! Turns a display name into a unique `(username, email)` pair and commits
//! the account. Per attempt:
//!
//! ```text
//! derive base -> probe (base, base1, base2, ...) -> insert
//!     ok                         -> done
//!     conflict on phone          -> PhoneConflict
//!     conflict on username/email -> next attempt
//!     conflict on unknown key    -> Unexpected
//! ```
//!
//! The probe only lowers the conflict rate. Correctness rests on the
//! repository's unique indexes and the bounded retry loop; no lock or
//! transaction spans probe and insert.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    AccountRegistration, AccountRemoval, AccountRepository, AccountRepositoryError,
    AccountsQuery, RegistrationRequest,
};
use crate::domain::{
    Account, AccountId, AccountLookup, AccountValidationError, Candidate, CandidateError,
    ConflictFields, Error, FullName, PhoneNumber, Position, UniqueField, derive_candidate,
};

/// Default mail domain for derived addresses.
pub const DEFAULT_EMAIL_DOMAIN: &str = "edulive.net";
/// Default number of derive-probe-insert cycles per registration.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Tunables for candidate derivation and the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPolicy {
    email_domain: String,
    max_attempts: u32,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_DOMAIN)
    }
}

impl RegistrationPolicy {
    /// Policy for `email_domain` with the default attempt budget.
    pub fn new(email_domain: impl Into<String>) -> Self {
        Self {
            email_domain: email_domain.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the attempt budget. Values below one are raised to one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Failures surfaced by [`AccountRegistrationService::create_account`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The name has no letters or digits to build a username from.
    #[error("name does not contain any usable letters or digits")]
    EmptyName,
    /// An input field failed value-object validation.
    #[error(transparent)]
    InvalidInput(#[from] AccountValidationError),
    /// Another account already owns this phone number.
    #[error("phone number {phone} is already registered")]
    PhoneConflict { phone: String },
    /// Identifier races could not be resolved within the attempt budget.
    #[error("could not claim a unique username after {attempts} attempts (last conflict on {last_conflict})")]
    RetryExhausted {
        attempts: u32,
        last_conflict: ConflictFields,
    },
    /// Storage reported a conflict the resolver does not recognise.
    #[error("unexpected registration conflict: {message}")]
    Unexpected { message: String },
    /// Storage failed for reasons unrelated to uniqueness.
    #[error(transparent)]
    Storage(AccountRepositoryError),
}

impl From<CandidateError> for RegistrationError {
    fn from(value: CandidateError) -> Self {
        match value {
            CandidateError::EmptyName => Self::EmptyName,
        }
    }
}

impl From<AccountRepositoryError> for RegistrationError {
    fn from(value: AccountRepositoryError) -> Self {
        Self::Storage(value)
    }
}

impl From<RegistrationError> for Error {
    fn from(value: RegistrationError) -> Self {
        let message = value.to_string();
        match value {
            RegistrationError::EmptyName => Error::invalid_request(message)
                .with_details(json!({ "field": "name", "code": "empty_name" })),
            RegistrationError::InvalidInput(err) => {
                let field = match err {
                    AccountValidationError::InvalidPhone { .. } => "phone",
                    AccountValidationError::NameTooLong { .. } => "name",
                    AccountValidationError::PositionLength { .. } => "position",
                    AccountValidationError::InvalidId => "id",
                    AccountValidationError::UnknownRole { .. } => "role",
                };
                Error::invalid_request(message)
                    .with_details(json!({ "field": field, "code": "invalid_value" }))
            }
            RegistrationError::PhoneConflict { phone } => {
                Error::conflict("User already registered").with_details(json!({
                    "field": "phone",
                    "code": "phone_registered",
                    "phone": phone,
                }))
            }
            RegistrationError::RetryExhausted { attempts, .. } => {
                Error::service_unavailable(message).with_details(json!({
                    "code": "retry_exhausted",
                    "attempts": attempts,
                }))
            }
            RegistrationError::Unexpected { .. } => Error::internal(message),
            RegistrationError::Storage(err) => map_repository_error(err),
        }
    }
}

fn map_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::Conflict { fields, message } => {
            Error::internal(format!("unexpected conflict on {fields}: {message}"))
        }
    }
}

/// Registration service implementing the account driving ports.
pub struct AccountRegistrationService<R> {
    repository: Arc<R>,
    policy: RegistrationPolicy,
}

impl<R> Clone for AccountRegistrationService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            policy: self.policy.clone(),
        }
    }
}

impl<R> AccountRegistrationService<R> {
    /// Create a service over `repository` using `policy`.
    pub fn new(repository: Arc<R>, policy: RegistrationPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &RegistrationPolicy {
        &self.policy
    }
}

impl<R> AccountRegistrationService<R>
where
    R: AccountRepository,
{
    /// Validate input, derive a unique identifier, and commit the account.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::EmptyName`] / [`RegistrationError::InvalidInput`]
    ///   before storage is touched;
    /// - [`RegistrationError::PhoneConflict`] when the phone is taken, whether
    ///   found up front or reported by the insert;
    /// - [`RegistrationError::RetryExhausted`] after `max_attempts` lost races;
    /// - [`RegistrationError::Unexpected`] for a conflict on no known field.
    pub async fn create_account(
        &self,
        name: &str,
        phone: &str,
        position: Option<&str>,
    ) -> Result<Account, RegistrationError> {
        let name = FullName::new(name)?;
        let phone = PhoneNumber::new(phone)?;
        let position = position.map(Position::new).transpose()?;
        let base = derive_candidate(name.as_ref(), self.policy.email_domain())?;

        if self
            .repository
            .find_by_field(&AccountLookup::Phone(phone.clone()))
            .await?
            .is_some()
        {
            return Err(RegistrationError::PhoneConflict {
                phone: phone.into(),
            });
        }

        let mut last_conflict = ConflictFields::default();
        for attempt in 1..=self.policy.max_attempts() {
            let candidate = self.probe(&base).await?;
            let account = Account::register(name.clone(), phone.clone(), position.clone(), candidate);

            match self.repository.insert(&account).await {
                Ok(stored) => {
                    info!(
                        account_id = %stored.id,
                        username = %stored.username,
                        attempt,
                        "account registered"
                    );
                    return Ok(stored);
                }
                Err(AccountRepositoryError::Conflict { fields, message }) => {
                    if fields.contains(UniqueField::Phone) {
                        return Err(RegistrationError::PhoneConflict {
                            phone: phone.into(),
                        });
                    }
                    if !fields.touches_identifier() {
                        error!(%fields, %message, "unrecognised unique constraint violation");
                        return Err(RegistrationError::Unexpected { message });
                    }
                    warn!(
                        username = %account.username,
                        %fields,
                        attempt,
                        "lost username race, regenerating candidate"
                    );
                    last_conflict = fields;
                }
                Err(other) => return Err(other.into()),
            }
        }

        warn!(
            base = %base.username,
            attempts = self.policy.max_attempts(),
            "registration attempt budget exhausted"
        );
        Err(RegistrationError::RetryExhausted {
            attempts: self.policy.max_attempts(),
            last_conflict,
        })
    }

    /// Find the first of `base`, `base1`, `base2`, … with no stored owner.
    ///
    /// Terminates because storage holds finitely many accounts.
    async fn probe(&self, base: &Candidate) -> Result<Candidate, AccountRepositoryError> {
        let mut suffix = 0_u32;
        loop {
            let candidate = base.with_suffix(suffix);
            let taken = self
                .repository
                .find_by_field(&AccountLookup::Username(candidate.username.clone()))
                .await?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
            debug!(username = %candidate.username, "username taken, probing next suffix");
            suffix += 1;
        }
    }
}

#[async_trait]
impl<R> AccountRegistration for AccountRegistrationService<R>
where
    R: AccountRepository,
{
    async fn register(&self, request: RegistrationRequest) -> Result<Account, Error> {
        let RegistrationRequest {
            name,
            phone,
            position,
        } = request;
        self.create_account(&name, &phone, position.as_deref())
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<R> AccountsQuery for AccountRegistrationService<R>
where
    R: AccountRepository,
{
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, Error> {
        self.repository
            .find_by_field(&AccountLookup::Username(username.to_owned()))
            .await
            .map_err(map_repository_error)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        self.repository.list_all().await.map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> AccountRemoval for AccountRegistrationService<R>
where
    R: AccountRepository,
{
    async fn remove(&self, id: &AccountId) -> Result<(), Error> {
        let removed = self
            .repository
            .delete_by_id(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("account {id} was not found")));
        }
        info!(account_id = %id, "account removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
