/// Runtime configuration: target network, backend endpoint, and tip contract.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TipError};
use crate::recipient::is_valid_address;

pub const DEFAULT_BACKEND_URL: &str = "https://stx-tip.onrender.com/api/v1/";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "STNHKEPYEPJ8ET55ZZ0M5A34J0R3N5FM2CMMMAZ6";
pub const DEFAULT_CONTRACT_NAME: &str = "tip-stacks";
pub const DEFAULT_TOKEN_TYPE: &str = "STX";

const DEFAULT_LOOKUP_DEBOUNCE_MS: u64 = 500;
const DEFAULT_MIN_LOOKUP_LEN: usize = 2;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    /// Address version prefixes: single-sig first, multi-sig second.
    pub fn address_prefixes(&self) -> [&'static str; 2] {
        match self {
            Network::Testnet => ["ST", "SN"],
            Network::Mainnet => ["SP", "SM"],
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(format!(
                "Unknown network: '{other}'. Use 'testnet' or 'mainnet'."
            )),
        }
    }
}

/// Fully-qualified contract identifier (`ADDRESS.NAME`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContractId {
    pub address: String,
    pub name: String,
}

impl ContractId {
    /// Parse `ADDRESS.NAME`, checking the address against the network format.
    pub fn parse(input: &str, network: Network) -> Result<Self> {
        let (address, name) = input.trim().split_once('.').ok_or_else(|| {
            TipError::InvalidState(format!(
                "Invalid contract '{input}'. Expected ADDRESS.NAME."
            ))
        })?;
        if !is_valid_address(address, network) {
            return Err(TipError::InvalidState(format!(
                "Invalid contract address '{address}' for {network}."
            )));
        }
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(TipError::InvalidState(format!(
                "Invalid contract name '{name}'."
            )));
        }
        Ok(Self {
            address: address.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.address, self.name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TipConfig {
    pub network: Network,
    pub backend_url: Url,
    pub contract: ContractId,
    pub token_type: String,
    /// Quiet period before a recipient lookup fires, in milliseconds.
    pub lookup_debounce_ms: u64,
    /// Lookups only fire for input strictly longer than this.
    pub min_lookup_len: usize,
    pub request_timeout_secs: u64,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            contract: ContractId {
                address: DEFAULT_CONTRACT_ADDRESS.to_string(),
                name: DEFAULT_CONTRACT_NAME.to_string(),
            },
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            lookup_debounce_ms: DEFAULT_LOOKUP_DEBOUNCE_MS,
            min_lookup_len: DEFAULT_MIN_LOOKUP_LEN,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl TipConfig {
    pub fn lookup_debounce(&self) -> Duration {
        Duration::from_millis(self.lookup_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Point the config at a different backend. A trailing slash is added so
    /// relative endpoint paths join under the base instead of replacing its
    /// last segment.
    pub fn with_backend_url(mut self, url: &str) -> Result<Self> {
        let normalized = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        };
        self.backend_url = Url::parse(&normalized)
            .map_err(|e| TipError::InvalidState(format!("Invalid backend URL '{url}': {e}")))?;
        Ok(self)
    }

    pub fn with_contract(mut self, contract: &str) -> Result<Self> {
        self.contract = ContractId::parse(contract, self.network)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_contract_is_valid_testnet_address() {
        let config = TipConfig::default();
        assert!(is_valid_address(&config.contract.address, config.network));
        assert_eq!(config.contract.to_string(), "STNHKEPYEPJ8ET55ZZ0M5A34J0R3N5FM2CMMMAZ6.tip-stacks");
    }

    #[test]
    fn parse_contract_id() {
        let id = ContractId::parse("STNHKEPYEPJ8ET55ZZ0M5A34J0R3N5FM2CMMMAZ6.tip-v2", Network::Testnet)
            .unwrap();
        assert_eq!(id.name, "tip-v2");
    }

    #[test]
    fn reject_contract_without_name() {
        let err = ContractId::parse("STNHKEPYEPJ8ET55ZZ0M5A34J0R3N5FM2CMMMAZ6", Network::Testnet)
            .unwrap_err();
        assert!(err.to_string().contains("ADDRESS.NAME"));
    }

    #[test]
    fn reject_contract_on_wrong_network() {
        assert!(ContractId::parse(
            "STNHKEPYEPJ8ET55ZZ0M5A34J0R3N5FM2CMMMAZ6.tip-stacks",
            Network::Mainnet
        )
        .is_err());
    }

    #[test]
    fn backend_url_gets_trailing_slash() {
        let config = TipConfig::default()
            .with_backend_url("http://localhost:8080/api/v1")
            .unwrap();
        let joined = config.backend_url.join("users/verified").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:8080/api/v1/users/verified");
    }

    #[test]
    fn network_from_str() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn default_debounce_is_half_second() {
        assert_eq!(TipConfig::default().lookup_debounce(), Duration::from_millis(500));
    }
}
