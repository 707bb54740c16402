/// Thin reqwest client for the TipStack backend: wallet registry, tip
/// bookkeeping, and email onboarding.
mod registry;
mod retry;
mod tips;
mod types;
mod users;

pub use retry::{with_backoff, RetryPolicy};
pub use types::*;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::TipConfig;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}{}", message_suffix(.message))]
    Status { status: u16, message: String },

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Transport failures and 5xx responses are worth retrying; 4xx are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Http(e) => !e.is_decode() && !e.is_builder(),
            BackendError::Status { status, .. } => *status >= 500,
            BackendError::InvalidUrl(_) | BackendError::Decode(_) => false,
        }
    }
}

fn message_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" ({message})")
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// The two backend calls the tip pipeline depends on. Implemented by
/// [`BackendClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait TipBackend: Send + Sync {
    /// Resolve an address against the registry. Failures are folded into the
    /// result's `error` field; this never fails outright.
    async fn lookup_wallet(&self, address: &str) -> RegistryLookupResult;

    /// Record a broadcast tip.
    async fn notify_tip_sent(&self, notice: &TipNotice) -> Result<()>;
}

pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: &TipConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Map non-2xx responses to `BackendError::Status`, keeping the server's
    /// `message` field when the body carries one.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<MessageBody>()
            .await
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn post<B: serde::Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<Response> {
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        Self::check(response).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        self.post(url, body)
            .await?
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TipBackend for BackendClient {
    async fn lookup_wallet(&self, address: &str) -> RegistryLookupResult {
        self.fetch_wallet_info(address).await
    }

    async fn notify_tip_sent(&self, notice: &TipNotice) -> Result<()> {
        self.send_tip_notice(notice).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_retry_only_on_5xx() {
        let server = BackendError::Status { status: 503, message: String::new() };
        let client = BackendError::Status { status: 404, message: String::new() };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(!BackendError::Decode("x".into()).is_retryable());
    }

    #[test]
    fn status_error_message() {
        let err = BackendError::Status { status: 404, message: String::new() };
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        let err = BackendError::Status { status: 400, message: "Email taken".into() };
        assert_eq!(err.to_string(), "HTTP error! status: 400 (Email taken)");
    }

    #[test]
    fn endpoints_join_under_base() {
        let config = TipConfig::default();
        let client = BackendClient::new(&config).unwrap();
        let url = client.endpoint("users/send-tip").unwrap();
        assert_eq!(url.as_str(), "https://stx-tip.onrender.com/api/v1/users/send-tip");
    }
}
