//! Builders wiring the account service to a storage backend.

use std::sync::Arc;

use tracing::warn;

use registration::domain::ports::AccountRepository;
use registration::domain::{AccountRegistrationService, RegistrationPolicy};
use registration::inbound::http::state::HttpState;
use registration::outbound::memory::InMemoryAccountRepository;
use registration::outbound::persistence::DieselAccountRepository;

use super::ServerConfig;

fn state_for<R>(repository: R, policy: RegistrationPolicy) -> HttpState
where
    R: AccountRepository + 'static,
{
    let service = AccountRegistrationService::new(Arc::new(repository), policy);
    HttpState::from_service(Arc::new(service))
}

/// Use PostgreSQL when a pool is configured, otherwise process memory.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => state_for(DieselAccountRepository::new(pool.clone()), config.policy.clone()),
        None => {
            warn!("no database configured; accounts will not survive a restart");
            state_for(InMemoryAccountRepository::new(), config.policy.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registration::domain::ports::RegistrationRequest;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn in_memory_state_applies_policy() {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("literal address"),
            RegistrationPolicy::new("school.test"),
        );
        let state = build_http_state(&config);

        let account = state
            .registration
            .register(RegistrationRequest {
                name: "Tran Thi Anh".to_owned(),
                phone: "0123456789".to_owned(),
                position: None,
            })
            .await
            .expect("in-memory registration succeeds");

        assert_eq!(account.email, "anhtt@school.test");
        let listed = state.accounts.list_accounts().await.expect("list succeeds");
        assert_eq!(listed, vec![account]);
    }
}
