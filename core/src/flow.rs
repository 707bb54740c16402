/// Tip form state machine: recipient entry with a debounced registry lookup,
/// the confirmation gate, and reconciliation of the submission outcome.
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::{RegistryLookupResult, TipBackend};
use crate::config::{Network, TipConfig};
use crate::error::{Result, TipError};
use crate::provider::WalletProvider;
use crate::recipient::is_valid_address;
use crate::session::SessionContext;
use crate::submitter::{TipSubmitter, TransactionOutcome};
use crate::tip::TipIntent;

pub const INVALID_FORMAT: &str = "Invalid Stacks address format";
pub const INVALID_ADDRESS: &str = "Invalid wallet address";
pub const LOOKUP_FAILED: &str = "Failed to fetch user info";
pub const UNVERIFIED: &str = "Unverified wallet address";
pub const CONNECT_FIRST: &str = "Please connect your wallet first to continue";
pub const MISSING_FIELDS: &str = "Please verify recipient and amount";

/// What the user has typed and what we learned about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TipForm {
    pub recipient: String,
    pub amount: String,
    pub lookup: Option<RegistryLookupResult>,
    /// Advisory message shown under the form. Never blocks submission by itself.
    pub validation_error: Option<String>,
    pub confirm_open: bool,
    pub searching: bool,
}

#[derive(Debug)]
struct LookupOutcome {
    lookup: Option<RegistryLookupResult>,
    validation_error: Option<String>,
}

pub struct TipFlow {
    backend: Arc<dyn TipBackend>,
    submitter: TipSubmitter,
    session: SessionContext,
    config: TipConfig,
    form: TipForm,
    lookup_task: Option<JoinHandle<LookupOutcome>>,
    pending_intent: Option<TipIntent>,
}

impl TipFlow {
    pub fn new(
        backend: Arc<dyn TipBackend>,
        provider: Arc<dyn WalletProvider>,
        session: SessionContext,
        config: TipConfig,
    ) -> Self {
        let submitter = TipSubmitter::new(provider, backend.clone(), config.clone());
        Self {
            backend,
            submitter,
            session,
            config,
            form: TipForm::default(),
            lookup_task: None,
            pending_intent: None,
        }
    }

    pub fn form(&self) -> &TipForm {
        &self.form
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn submitter(&self) -> &TipSubmitter {
        &self.submitter
    }

    /// Update the recipient text. Any lookup in flight is aborted; input longer
    /// than the minimum starts a new one after the quiet period. An open
    /// confirmation is withdrawn.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_recipient(&mut self, input: &str) {
        self.dismiss_confirmation();
        self.form.recipient = input.to_string();
        self.form.lookup = None;
        self.form.validation_error = None;
        self.abort_lookup();

        let address = input.trim();
        if address.chars().count() <= self.config.min_lookup_len {
            return;
        }

        self.form.searching = true;
        self.lookup_task = Some(tokio::spawn(run_lookup(
            self.backend.clone(),
            address.to_string(),
            self.config.network,
            self.session.wallet_connected(),
            self.config.lookup_debounce(),
        )));
    }

    pub fn set_amount(&mut self, input: &str) {
        self.dismiss_confirmation();
        self.form.amount = input.to_string();
    }

    pub fn is_searching(&self) -> bool {
        self.lookup_task.is_some()
    }

    /// Wait for the current lookup, if any, and apply its result.
    pub async fn settle_lookup(&mut self) {
        let Some(task) = self.lookup_task.take() else {
            return;
        };
        match task.await {
            Ok(outcome) => {
                self.form.lookup = outcome.lookup;
                self.form.validation_error = outcome.validation_error;
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!("recipient lookup task failed: {e}"),
        }
        self.form.searching = false;
    }

    pub fn can_request_confirmation(&self) -> bool {
        !self.form.amount.trim().is_empty()
            && is_valid_address(self.form.recipient.trim(), self.config.network)
            && !self.submitter.is_submitting()
    }

    /// Open the confirmation dialog for the current form. On refusal the
    /// reason is also recorded as the form's validation error.
    pub fn request_confirmation(&mut self) -> Result<TipIntent> {
        let recipient = self.form.recipient.trim().to_string();
        let amount = self.form.amount.trim().to_string();

        let refusal = if recipient.is_empty() || amount.is_empty() {
            Some(TipError::InvalidState(MISSING_FIELDS.to_string()))
        } else if !is_valid_address(&recipient, self.config.network) {
            Some(TipError::InvalidRecipient(INVALID_ADDRESS.to_string()))
        } else if !self.session.wallet_connected() {
            Some(TipError::InvalidState(CONNECT_FIRST.to_string()))
        } else if self.submitter.is_submitting() {
            Some(TipError::InvalidState(
                "A tip is already being submitted".to_string(),
            ))
        } else {
            None
        };
        if let Some(err) = refusal {
            self.form.validation_error = Some(err.to_string());
            return Err(err);
        }

        let intent = TipIntent::new(recipient, amount);
        self.form.confirm_open = true;
        self.form.validation_error = None;
        self.pending_intent = Some(intent.clone());
        Ok(intent)
    }

    pub fn dismiss_confirmation(&mut self) {
        self.form.confirm_open = false;
        self.pending_intent = None;
    }

    /// Submit the confirmed tip. A success resets the form; a failure or
    /// cancellation keeps recipient and amount so the user can retry.
    pub async fn confirm(&mut self) -> Result<TransactionOutcome> {
        let intent = self
            .pending_intent
            .take()
            .ok_or_else(|| TipError::InvalidState("No tip awaiting confirmation".to_string()))?;

        let outcome = self.submitter.submit(&intent).await;
        match &outcome {
            TransactionOutcome::Success { transaction_id } => {
                debug!(%transaction_id, "tip confirmed, resetting form");
                self.clear();
            }
            other => {
                self.form.confirm_open = false;
                self.form.validation_error = other.user_message();
            }
        }
        self.submitter.reset();
        Ok(outcome)
    }

    /// Reset the form and drop any pending lookup.
    pub fn clear(&mut self) {
        self.abort_lookup();
        self.form = TipForm::default();
        self.pending_intent = None;
    }

    fn abort_lookup(&mut self) {
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
        self.form.searching = false;
    }
}

impl Drop for TipFlow {
    fn drop(&mut self) {
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
    }
}

async fn run_lookup(
    backend: Arc<dyn TipBackend>,
    address: String,
    network: Network,
    wallet_connected: bool,
    debounce: std::time::Duration,
) -> LookupOutcome {
    tokio::time::sleep(debounce).await;

    if !is_valid_address(&address, network) {
        return LookupOutcome {
            lookup: None,
            validation_error: Some(INVALID_FORMAT.to_string()),
        };
    }

    let result = backend.lookup_wallet(&address).await;
    if result.error.is_some() {
        let notice = if wallet_connected { UNVERIFIED } else { CONNECT_FIRST };
        return LookupOutcome {
            lookup: Some(RegistryLookupResult::failed(LOOKUP_FAILED)),
            validation_error: Some(notice.to_string()),
        };
    }
    LookupOutcome {
        lookup: Some(result),
        validation_error: None,
    }
}
