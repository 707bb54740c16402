use tracing::{debug, warn};

use super::types::{RegistryLookupResult, WalletInfoResponse};
use super::{BackendClient, Result};

impl BackendClient {
    /// Look up registry metadata for an address via `GET users/wallet/{address}`.
    /// Any failure resolves to `found: false` with the error message set.
    pub async fn fetch_wallet_info(&self, address: &str) -> RegistryLookupResult {
        match self.try_fetch_wallet_info(address).await {
            Ok(result) => result,
            Err(e) => {
                warn!(address, "registry lookup failed: {e}");
                RegistryLookupResult::failed(e.to_string())
            }
        }
    }

    async fn try_fetch_wallet_info(&self, address: &str) -> Result<RegistryLookupResult> {
        let mut url = self.endpoint("users/wallet/")?;
        url.path_segments_mut()
            .map_err(|_| super::BackendError::Decode("backend URL cannot be a base".into()))?
            .pop_if_empty()
            .push(address);

        let body: WalletInfoResponse = self.get_json(url).await?;
        let data = body.data;
        let email = data
            .as_ref()
            .and_then(|d| d.email.clone())
            .filter(|e| !e.trim().is_empty());
        let wallet = data.and_then(|d| d.wallet);

        debug!(address, found = email.is_some(), "registry lookup");
        Ok(RegistryLookupResult {
            found: email.is_some(),
            email,
            wallet_address: Some(wallet.unwrap_or_else(|| address.to_string())),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TipConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDR: &str = "ST123456789012345678901234567890123456";

    async fn client_for(server: &MockServer) -> BackendClient {
        let config = TipConfig::default().with_backend_url(&server.uri()).unwrap();
        BackendClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn found_when_email_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/users/wallet/{ADDR}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "email": "creator@example.com", "wallet": ADDR }
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch_wallet_info(ADDR).await;
        assert!(result.found);
        assert_eq!(result.email.as_deref(), Some("creator@example.com"));
        assert_eq!(result.wallet_address.as_deref(), Some(ADDR));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn empty_email_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/users/wallet/{ADDR}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "email": "" }
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch_wallet_info(ADDR).await;
        assert!(!result.found);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn not_found_status_becomes_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch_wallet_info(ADDR).await;
        assert!(!result.found);
        assert_eq!(result.error.as_deref(), Some("HTTP error! status: 404"));
    }

    #[tokio::test]
    async fn malformed_body_becomes_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch_wallet_info(ADDR).await;
        assert!(!result.found);
        assert!(result.error.unwrap().contains("Unexpected backend response"));
    }

    #[tokio::test]
    async fn unreachable_backend_becomes_error_result() {
        let config = TipConfig::default()
            .with_backend_url("http://127.0.0.1:9")
            .unwrap();
        let client = BackendClient::new(&config).unwrap();
        let result = client.fetch_wallet_info(ADDR).await;
        assert!(!result.found);
        assert!(result.error.is_some());
    }
}
