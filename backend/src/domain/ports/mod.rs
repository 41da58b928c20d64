//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_registration;
mod account_repository;

#[cfg(test)]
pub use account_registration::{MockAccountRegistration, MockAccountRemoval, MockAccountsQuery};
pub use account_registration::{
    AccountRegistration, AccountRemoval, AccountsQuery, RegistrationRequest,
};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
