//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they depend only on the
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountRegistration, AccountRemoval, AccountsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn AccountRegistration>,
    pub accounts: Arc<dyn AccountsQuery>,
    pub removal: Arc<dyn AccountRemoval>,
}

impl HttpState {
    /// Construct state from individual ports.
    pub fn new(
        registration: Arc<dyn AccountRegistration>,
        accounts: Arc<dyn AccountsQuery>,
        removal: Arc<dyn AccountRemoval>,
    ) -> Self {
        Self {
            registration,
            accounts,
            removal,
        }
    }

    /// Construct state from one service implementing every account port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use registration::domain::{AccountRegistrationService, RegistrationPolicy};
    /// use registration::inbound::http::state::HttpState;
    /// use registration::outbound::memory::InMemoryAccountRepository;
    ///
    /// let service = AccountRegistrationService::new(
    ///     Arc::new(InMemoryAccountRepository::new()),
    ///     RegistrationPolicy::default(),
    /// );
    /// let state = HttpState::from_service(Arc::new(service));
    /// let _registration = state.registration.clone();
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: AccountRegistration + AccountsQuery + AccountRemoval + 'static,
    {
        Self {
            registration: service.clone(),
            accounts: service.clone(),
            removal: service,
        }
    }
}
