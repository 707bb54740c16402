use std::path::PathBuf;

use anyhow::Context;

pub mod backend;
pub mod clarity;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod flow;
pub mod provider;
pub mod recipient;
pub mod service;
pub mod session;
pub mod submitter;
pub mod tip;

pub use backend::{BackendClient, BackendError, RegistryLookupResult, TipBackend};
pub use clarity::ClarityValue;
pub use commands::Command;
pub use config::{ContractId, Network, TipConfig};
pub use error::TipError;
pub use flow::{TipFlow, TipForm};
pub use provider::{ContractCallRequest, ProviderResponse, WalletProvider};
pub use recipient::{is_valid_address, Recipient};
pub use service::TipService;
pub use session::{SessionContext, SessionStore};
pub use submitter::{SubmitterState, TipSubmitter, TransactionOutcome};
pub use tip::{prepare_tip_args, PreparedTip, TipIntent};

/// XDG-compliant data directory for the session file.
/// Linux: `~/.local/share/tipstack/`, macOS: `~/Library/Application Support/tipstack/`
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Cannot determine data directory")?
        .join("tipstack");
    Ok(dir)
}
