/// Tip submission: argument preparation, wallet hand-off, and backend
/// bookkeeping after a successful broadcast.
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::{TipBackend, TipNotice};
use crate::config::TipConfig;
use crate::provider::{
    AnchorMode, ContractCallRequest, PostConditionMode, ProviderResponse, WalletProvider,
};
use crate::recipient::is_valid_address;
use crate::tip::{prepare_tip_args, TipIntent};

pub const TIP_FUNCTION: &str = "tip";
pub const CANCELLED_MESSAGE: &str = "Transaction cancelled";
const FALLBACK_FAILURE: &str = "Failed to process transaction";
const ALREADY_SUBMITTING: &str = "A tip is already being submitted";
const INVALID_RECIPIENT: &str = "Invalid wallet address";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitterState {
    Idle,
    Submitting,
    Succeeded,
    Cancelled,
    Failed,
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TransactionOutcome {
    Success { transaction_id: String },
    Cancelled,
    Failed { reason: String },
}

impl TransactionOutcome {
    fn failed(reason: impl std::fmt::Display) -> Self {
        let reason = reason.to_string();
        if reason.trim().is_empty() {
            TransactionOutcome::Failed {
                reason: FALLBACK_FAILURE.to_string(),
            }
        } else {
            TransactionOutcome::Failed { reason }
        }
    }

    fn terminal_state(&self) -> SubmitterState {
        match self {
            TransactionOutcome::Success { .. } => SubmitterState::Succeeded,
            TransactionOutcome::Cancelled => SubmitterState::Cancelled,
            TransactionOutcome::Failed { .. } => SubmitterState::Failed,
        }
    }

    /// Message to show the user, if the outcome was not a success.
    pub fn user_message(&self) -> Option<String> {
        match self {
            TransactionOutcome::Success { .. } => None,
            TransactionOutcome::Cancelled => Some(CANCELLED_MESSAGE.to_string()),
            TransactionOutcome::Failed { reason } => Some(reason.clone()),
        }
    }
}

pub struct TipSubmitter {
    provider: Arc<dyn WalletProvider>,
    backend: Arc<dyn TipBackend>,
    config: TipConfig,
    state: watch::Sender<SubmitterState>,
}

impl TipSubmitter {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        backend: Arc<dyn TipBackend>,
        config: TipConfig,
    ) -> Self {
        let (state, _) = watch::channel(SubmitterState::Idle);
        Self {
            provider,
            backend,
            config,
            state,
        }
    }

    pub fn state(&self) -> SubmitterState {
        *self.state.borrow()
    }

    pub fn is_submitting(&self) -> bool {
        self.state() == SubmitterState::Submitting
    }

    /// Observe state transitions, e.g. to disable a send control.
    pub fn subscribe(&self) -> watch::Receiver<SubmitterState> {
        self.state.subscribe()
    }

    /// Return a terminal state to `Idle`. No-op while submitting.
    pub fn reset(&self) {
        self.state.send_if_modified(|s| {
            if *s == SubmitterState::Submitting || *s == SubmitterState::Idle {
                return false;
            }
            *s = SubmitterState::Idle;
            true
        });
    }

    /// Submit a tip through the wallet provider.
    ///
    /// Never returns an error: every failure mode is folded into the outcome.
    /// Once the wallet reports a transaction id the outcome is `Success`, even
    /// if the backend notification fails.
    pub async fn submit(&self, intent: &TipIntent) -> TransactionOutcome {
        let mut claimed = false;
        self.state.send_if_modified(|s| {
            if *s == SubmitterState::Submitting {
                return false;
            }
            *s = SubmitterState::Submitting;
            claimed = true;
            true
        });
        if !claimed {
            warn!(recipient = %intent.recipient, "rejected tip: submission already in flight");
            return TransactionOutcome::failed(ALREADY_SUBMITTING);
        }

        let outcome = self.run(intent).await;
        self.state.send_replace(outcome.terminal_state());
        outcome
    }

    async fn run(&self, intent: &TipIntent) -> TransactionOutcome {
        if !is_valid_address(intent.recipient.trim(), self.config.network) {
            warn!(recipient = %intent.recipient, "rejected tip: invalid recipient address");
            return TransactionOutcome::failed(INVALID_RECIPIENT);
        }

        let prepared = match prepare_tip_args(&intent.recipient, &intent.amount, &self.config.token_type) {
            Ok(p) => p,
            Err(e) => return TransactionOutcome::failed(e),
        };

        debug!(
            contract = %self.config.contract,
            network = %self.config.network,
            micro_stx = prepared.micro_stx,
            args = ?prepared.args_hex(),
            "prepared tip arguments"
        );

        let request = ContractCallRequest {
            network: self.config.network,
            anchor_mode: AnchorMode::Any,
            contract_address: self.config.contract.address.clone(),
            contract_name: self.config.contract.name.clone(),
            function_name: TIP_FUNCTION.to_string(),
            function_args: prepared.args.to_vec(),
            post_condition_mode: PostConditionMode::Allow,
        };

        let response = match self.provider.contract_call(request).await {
            Ok(r) => r,
            Err(e) => {
                warn!("wallet provider error: {e:#}");
                return TransactionOutcome::failed(e);
            }
        };

        match response {
            ProviderResponse::Finished { tx_id } => {
                info!(%tx_id, recipient = %intent.recipient, micro_stx = prepared.micro_stx, "tip broadcast");
                let notice = TipNotice {
                    recipient_address: intent.recipient.clone(),
                    amount: intent.amount.trim().to_string(),
                    transaction_id: tx_id.clone(),
                };
                if let Err(e) = self.backend.notify_tip_sent(&notice).await {
                    warn!(%tx_id, "backend tip notification failed: {e}");
                }
                TransactionOutcome::Success {
                    transaction_id: tx_id,
                }
            }
            ProviderResponse::Cancelled => {
                info!(recipient = %intent.recipient, "tip cancelled in wallet");
                TransactionOutcome::Cancelled
            }
        }
    }
}
