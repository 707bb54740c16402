use std::io::Write;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tipstack_core::provider::{ContractCallRequest, ProviderResponse, WalletProvider};

/// Terminal stand-in for a browser wallet: prints the contract call for the
/// user to sign elsewhere and reads the broadcast transaction id back.
/// An empty answer cancels.
pub struct PromptWallet;

#[async_trait]
impl WalletProvider for PromptWallet {
    async fn contract_call(&self, request: ContractCallRequest) -> Result<ProviderResponse> {
        let payload = serde_json::to_string_pretty(&request.to_wallet_payload())?;
        let tx_id = tokio::task::spawn_blocking(move || read_tx_id(&payload))
            .await
            .context("Wallet prompt task failed")??;

        Ok(match tx_id {
            Some(tx_id) => ProviderResponse::Finished { tx_id },
            None => ProviderResponse::Cancelled,
        })
    }
}

// Prompts go to stderr so `--json` output stays clean. A malformed id is
// asked for again; only an empty answer cancels.
fn read_tx_id(payload: &str) -> Result<Option<String>> {
    let stdin = std::io::stdin();
    let mut err = std::io::stderr();
    writeln!(err, "Approve this contract call in your wallet:")?;
    writeln!(err, "{payload}")?;

    loop {
        write!(err, "Transaction id (empty to cancel): ")?;
        err.flush()?;

        let mut input = String::new();
        let read = stdin
            .read_line(&mut input)
            .context("Failed to read transaction id")?;
        match parse_answer(&input, read == 0) {
            Answer::Cancel => return Ok(None),
            Answer::TxId(tx_id) => return Ok(Some(tx_id)),
            Answer::Retry(reason) => writeln!(err, "{reason}")?,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Cancel,
    TxId(String),
    Retry(String),
}

fn parse_answer(input: &str, eof: bool) -> Answer {
    let input = input.trim();
    if eof || input.is_empty() {
        return Answer::Cancel;
    }
    match normalize_tx_id(input) {
        Ok(tx_id) => Answer::TxId(tx_id),
        Err(e) => Answer::Retry(e.to_string()),
    }
}

/// Accept a 32-byte transaction id with or without `0x`; return it
/// lowercased with the prefix.
fn normalize_tx_id(input: &str) -> Result<String> {
    let hex = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Invalid transaction id '{input}'. Expected 64 hex characters.");
    }
    Ok(format!("0x{}", hex.to_lowercase()))
}
