use serde::{Deserialize, Serialize};

/// Registry metadata for a recipient. Lives for one lookup cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryLookupResult {
    pub found: bool,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub error: Option<String>,
}

impl RegistryLookupResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            found: false,
            email: None,
            wallet_address: None,
            error: Some(message.into()),
        }
    }
}

/// Body of `POST users/send-tip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TipNotice {
    pub recipient_address: String,
    pub amount: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct WalletInfoResponse {
    pub data: Option<WalletInfoData>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct WalletInfoData {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub wallet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ExistsResponse {
    #[serde(default)]
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ConnectWalletRequest<'a> {
    pub email: &'a str,
    pub wallet: &'a str,
}

/// Result of registering an email against a wallet. The activation token is
/// needed to verify the emailed code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletResponse {
    pub verification_token: String,
    #[serde(default)]
    pub activation_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct VerifyAccountRequest<'a> {
    pub activation_token: &'a str,
    #[serde(rename = "activation_Code")]
    pub activation_code: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct VerifiedUsersResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<VerifiedUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedUser {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub email: String,
    pub wallet: String,
}
