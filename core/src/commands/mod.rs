/// Command definitions and parsing for the tipping REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use crate::backend::RegistryLookupResult;
use crate::display;
use crate::error::Result;
use crate::flow::TipFlow;
use crate::tip::TipIntent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the recipient address: to <address>
    To { recipient: String },
    /// Set the tip amount in STX: amount <stx>
    Amount { amount: String },
    /// Fill the form and send in one step: tip <address> <stx>
    Tip { recipient: String, amount: String },
    /// Send the tip currently in the form
    Send,
    /// Show the form and registry status
    Status,
    /// Reset the form
    Clear,
    /// Show the connected wallet address
    Address,
    /// Register an email for the connected wallet: register <email>
    Register { email: String },
    /// Verify the emailed code: verify <code>
    Verify { code: String },
    /// List users with a verified email
    Verified,
    /// Print help
    Help { command: Option<String> },
    /// Exit
    Exit,
}

impl Command {
    /// Whether this command submits a tip through the wallet.
    pub fn submits_tip(&self) -> bool {
        matches!(self, Command::Tip { .. } | Command::Send)
    }

    /// For tip-submitting commands: load the form, wait for the registry
    /// lookup and open the confirmation dialog. Returns the question to ask
    /// before the wallet is invoked; `None` for every other command.
    pub async fn confirmation_prompt(&self, flow: &mut TipFlow) -> Result<Option<String>> {
        if !self.submits_tip() {
            return Ok(None);
        }
        let intent = self.open_confirmation(flow).await?;
        Ok(Some(confirmation_text(&intent, flow.form().lookup.as_ref())))
    }

    async fn open_confirmation(&self, flow: &mut TipFlow) -> Result<TipIntent> {
        if let Command::Tip { recipient, amount } = self {
            flow.set_recipient(recipient);
            flow.set_amount(amount);
        }
        flow.settle_lookup().await;
        flow.request_confirmation()
    }
}

fn confirmation_text(intent: &TipIntent, lookup: Option<&RegistryLookupResult>) -> String {
    let amount = match display::parse_stx_amount(&intent.amount) {
        Ok(micro) => display::format_stx(micro),
        Err(_) => format!("{} STX", intent.amount),
    };
    let registry = lookup
        .map(display::format_lookup_status)
        .unwrap_or_else(|| "not checked".to_string());
    format!(
        "Tip {amount} to {}\n  Registry: {registry}\nSend?",
        intent.recipient
    )
}
