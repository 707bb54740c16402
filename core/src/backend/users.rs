use tracing::{debug, info};

use super::retry::{with_backoff, RetryPolicy};
use super::types::{
    ConnectWalletRequest, ConnectWalletResponse, ExistsResponse, MessageBody, VerifiedUser,
    VerifiedUsersResponse, VerifyAccountRequest,
};
use super::{BackendClient, BackendError, Result};

impl BackendClient {
    /// Whether a wallet is already registered: `GET users/exists?wallet=...`.
    /// The backend stores addresses lowercased.
    pub async fn user_exists(&self, wallet: &str) -> Result<bool> {
        let mut url = self.endpoint("users/exists")?;
        url.query_pairs_mut()
            .append_pair("wallet", &wallet.to_lowercase());
        let body: ExistsResponse = self.get_json(url).await?;
        debug!(wallet, exists = body.exists, "user existence check");
        Ok(body.exists)
    }

    /// Register an email for a wallet. The backend emails a verification
    /// code and returns the activation token needed to redeem it.
    pub async fn connect_wallet(
        &self,
        email: &str,
        wallet: &str,
        policy: RetryPolicy,
    ) -> Result<ConnectWalletResponse> {
        let url = self.endpoint("users/connect-wallet")?;
        let body = ConnectWalletRequest { email, wallet };
        let response: ConnectWalletResponse =
            with_backoff(policy, || self.post_json(url.clone(), &body)).await?;
        info!(wallet, "email registration submitted");
        Ok(response)
    }

    /// Redeem an emailed verification code. Returns the server's message.
    pub async fn verify_account(&self, activation_token: &str, code: &str) -> Result<String> {
        let url = self.endpoint("users/verify-account")?;
        let body = VerifyAccountRequest {
            activation_token,
            activation_code: code,
        };
        let response: MessageBody = self.post_json(url, &body).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Account verified.".to_string()))
    }

    /// Directory of users with a verified email.
    pub async fn verified_users(&self) -> Result<Vec<VerifiedUser>> {
        let url = self.endpoint("users/verified")?;
        let body: VerifiedUsersResponse = self.get_json(url).await?;
        if !body.success {
            return Err(BackendError::Decode(
                "Failed to fetch verified users".to_string(),
            ));
        }
        Ok(body.data)
    }
}
