/// Wallet-provider abstraction: the external application that holds keys and
/// asks the user to approve a contract call.
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::clarity::ClarityValue;
use crate::config::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorMode {
    Any,
    OnChainOnly,
    OffChainOnly,
}

/// `Allow` lets the transaction move tokens the wallet cannot predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostConditionMode {
    Allow,
    Deny,
}

/// Everything a wallet needs to build and sign a contract call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCallRequest {
    pub network: Network,
    pub anchor_mode: AnchorMode,
    pub contract_address: String,
    pub contract_name: String,
    pub function_name: String,
    pub function_args: Vec<ClarityValue>,
    pub post_condition_mode: PostConditionMode,
}

impl ContractCallRequest {
    /// JSON payload with hex-encoded arguments, the form wallets accept.
    pub fn to_wallet_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "network": self.network,
            "anchorMode": self.anchor_mode,
            "contractAddress": self.contract_address,
            "contractName": self.contract_name,
            "functionName": self.function_name,
            "functionArgs": self.function_args.iter().map(ClarityValue::to_hex).collect::<Vec<_>>(),
            "postConditionMode": self.post_condition_mode,
        })
    }
}

/// How the wallet resolved a contract-call request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    /// User approved and the transaction was broadcast.
    Finished { tx_id: String },
    /// User closed or rejected the approval prompt.
    Cancelled,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Hand a contract call to the wallet and wait for the user's decision.
    /// An `Err` means the wallet could not process the request at all.
    async fn contract_call(&self, request: ContractCallRequest) -> Result<ProviderResponse>;
}
