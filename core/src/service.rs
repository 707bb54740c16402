use std::sync::Arc;

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::backend::{BackendClient, ConnectWalletResponse, RetryPolicy, VerifiedUser};
use crate::config::TipConfig;
use crate::error::{Result, TipError};
use crate::flow::{TipFlow, CONNECT_FIRST};
use crate::provider::WalletProvider;
use crate::recipient::Recipient;
use crate::session::{SessionContext, SessionStore};

/// Session bootstrap and onboarding around the tip flow. Owns the backend
/// client and the persisted session; hands out [`TipFlow`]s bound to the
/// session it resolved at startup.
pub struct TipService {
    config: TipConfig,
    backend: Arc<BackendClient>,
    provider: Arc<dyn WalletProvider>,
    session: SessionContext,
    store: SessionStore,
    retry: RetryPolicy,
    needs_registration: bool,
}

impl TipService {
    /// Resolve the connected wallet (explicit address, else the stored one),
    /// persist it, and ask the backend whether it still needs to register an
    /// email. A failed existence check is treated as registered.
    pub async fn bootstrap(
        config: TipConfig,
        provider: Arc<dyn WalletProvider>,
        address: Option<&str>,
        mut store: SessionStore,
    ) -> Result<Self> {
        let backend = Arc::new(BackendClient::new(&config)?);

        let address = match address.map(str::trim).filter(|a| !a.is_empty()) {
            Some(a) => Some(a.to_string()),
            None => store.wallet_address().map(str::to_string),
        };

        let session = match address {
            Some(addr) => {
                let recipient = Recipient::parse(&addr, config.network).map_err(|_| {
                    TipError::InvalidRecipient(format!(
                        "Invalid wallet address '{addr}' for {}",
                        config.network
                    ))
                })?;
                store
                    .set_wallet_address(recipient.as_str())
                    .map_err(|e| TipError::Storage(format!("{e:#}")))?;
                SessionContext::connected(recipient.as_str())
            }
            None => SessionContext::disconnected(),
        };

        let needs_registration = match session.wallet_address() {
            Some(addr) => match backend.user_exists(addr).await {
                Ok(exists) => !exists,
                Err(e) => {
                    warn!(address = addr, "existence check failed: {e}");
                    false
                }
            },
            None => false,
        };

        info!(
            connected = session.wallet_connected(),
            needs_registration,
            network = %config.network,
            "session ready"
        );

        Ok(Self {
            config,
            backend,
            provider,
            session,
            store,
            retry: RetryPolicy::default(),
            needs_registration,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &TipConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// The connected wallet has no registered email yet.
    pub fn needs_registration(&self) -> bool {
        self.needs_registration
    }

    /// An email was registered and its code has not been verified yet.
    pub fn pending_verification(&self) -> Option<&str> {
        self.store
            .activation_token()
            .and_then(|_| self.store.email())
    }

    /// A fresh tip form for the current session.
    pub fn new_flow(&self) -> TipFlow {
        TipFlow::new(
            self.backend.clone(),
            self.provider.clone(),
            self.session.clone(),
            self.config.clone(),
        )
    }

    /// Register an email for the connected wallet. The backend mails a code;
    /// the activation token needed to redeem it is kept in the session file.
    pub async fn register_email(&mut self, email: &str) -> Result<ConnectWalletResponse> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(TipError::InvalidState(
                "Please enter a valid email address".to_string(),
            ));
        }
        let wallet = self
            .session
            .wallet_address()
            .ok_or_else(|| TipError::InvalidState(CONNECT_FIRST.to_string()))?
            .to_string();

        let response = self
            .backend
            .connect_wallet(&email, &wallet, self.retry)
            .await?;
        self.store
            .set_pending_verification(&email, &response.verification_token)
            .map_err(|e| TipError::Storage(format!("{e:#}")))?;
        info!(wallet = %wallet, "verification code requested");
        Ok(response)
    }

    /// Redeem the emailed code against the stored activation token.
    pub async fn verify_email(&mut self, code: &str) -> Result<String> {
        let code = code.trim();
        if code.is_empty() {
            return Err(TipError::InvalidState(
                "Please enter the verification code".to_string(),
            ));
        }
        let token = Zeroizing::new(
            self.store
                .activation_token()
                .ok_or_else(|| {
                    TipError::InvalidState(
                        "No pending email verification. Register an email first.".to_string(),
                    )
                })?
                .to_string(),
        );

        let message = self.backend.verify_account(&token, code).await?;
        self.store
            .clear_activation_token()
            .map_err(|e| TipError::Storage(format!("{e:#}")))?;
        self.needs_registration = false;
        Ok(message)
    }

    pub async fn verified_users(&self) -> Result<Vec<VerifiedUser>> {
        Ok(self.backend.verified_users().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ContractCallRequest, ProviderResponse};
    use async_trait::async_trait;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDR: &str = "ST123456789012345678901234567890123456";

    struct NoWallet;

    #[async_trait]
    impl WalletProvider for NoWallet {
        async fn contract_call(&self, _request: ContractCallRequest) -> anyhow::Result<ProviderResponse> {
            Ok(ProviderResponse::Cancelled)
        }
    }

    fn store() -> SessionStore {
        let dir = tempfile::tempdir().unwrap();
        SessionStore::open_at(dir.keep().join("session.json")).unwrap()
    }

    async fn service(server: &MockServer, address: Option<&str>, store: SessionStore) -> Result<TipService> {
        let config = TipConfig::default().with_backend_url(&server.uri()).unwrap();
        Ok(TipService::bootstrap(config, Arc::new(NoWallet), address, store)
            .await?
            .with_retry_policy(RetryPolicy {
                max_attempts: 2,
                base_delay: Duration::from_millis(1),
            }))
    }

    async fn mount_exists(server: &MockServer, exists: bool) {
        Mock::given(method("GET"))
            .and(path("/users/exists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"exists": exists})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn unknown_wallet_needs_registration() {
        let server = MockServer::start().await;
        mount_exists(&server, false).await;

        let svc = service(&server, Some(ADDR), store()).await.unwrap();
        assert!(svc.session().wallet_connected());
        assert!(svc.needs_registration());
    }

    #[tokio::test]
    async fn failed_existence_check_does_not_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let svc = service(&server, Some(ADDR), store()).await.unwrap();
        assert!(!svc.needs_registration());
    }

    #[tokio::test]
    async fn stored_address_is_reused() {
        let server = MockServer::start().await;
        mount_exists(&server, true).await;
        let mut st = store();
        st.set_wallet_address(ADDR).unwrap();

        let svc = service(&server, None, st).await.unwrap();
        assert_eq!(svc.session().wallet_address(), Some(ADDR));
        assert!(!svc.needs_registration());
    }

    #[tokio::test]
    async fn no_address_is_disconnected() {
        let server = MockServer::start().await;
        let svc = service(&server, None, store()).await.unwrap();
        assert!(!svc.session().wallet_connected());
        assert!(!svc.new_flow().session().wallet_connected());
    }

    #[tokio::test]
    async fn malformed_address_is_rejected() {
        let server = MockServer::start().await;
        let err = service(&server, Some("invalidaddr"), store()).await.err().unwrap();
        assert!(matches!(err, TipError::InvalidRecipient(_)));
    }

    #[tokio::test]
    async fn register_then_verify() {
        let server = MockServer::start().await;
        mount_exists(&server, false).await;
        Mock::given(method("POST"))
            .and(path("/users/connect-wallet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "verificationToken": "tok-9",
                "activationCode": "1234"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users/verify-account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "Account verified"})))
            .mount(&server)
            .await;

        let mut svc = service(&server, Some(ADDR), store()).await.unwrap();
        svc.register_email("  Me@Example.com ").await.unwrap();
        assert_eq!(svc.pending_verification(), Some("me@example.com"));

        let message = svc.verify_email("1234").await.unwrap();
        assert_eq!(message, "Account verified");
        assert!(svc.pending_verification().is_none());
        assert!(!svc.needs_registration());
    }

    #[tokio::test]
    async fn verify_without_registration_is_refused() {
        let server = MockServer::start().await;
        mount_exists(&server, true).await;
        let mut svc = service(&server, Some(ADDR), store()).await.unwrap();
        assert!(matches!(svc.verify_email("1234").await, Err(TipError::InvalidState(_))));
    }

    #[tokio::test]
    async fn register_requires_connected_wallet() {
        let server = MockServer::start().await;
        let mut svc = service(&server, None, store()).await.unwrap();
        let err = svc.register_email("me@example.com").await.unwrap_err();
        assert_eq!(err.to_string(), CONNECT_FIRST);
    }
}
