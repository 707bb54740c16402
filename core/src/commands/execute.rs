use anyhow::Result;

use super::help::help_text;
use super::Command;
use crate::display;
use crate::flow::TipFlow;
use crate::service::TipService;
use crate::submitter::TransactionOutcome;

impl Command {
    /// Execute a command and return the output string.
    ///
    /// Tip commands submit whatever [`Command::confirmation_prompt`] opened;
    /// when it was not called (one-shot mode) the dialog is opened here and
    /// the wallet's own approval step is the only confirmation.
    pub async fn execute(
        &self,
        service: &mut TipService,
        flow: &mut TipFlow,
        json_output: bool,
    ) -> Result<String> {
        match self {
            Command::To { recipient } => {
                flow.set_recipient(recipient);
                flow.settle_lookup().await;
                Ok(form_output(flow, json_output))
            }

            Command::Amount { amount } => {
                flow.set_amount(amount);
                Ok(form_output(flow, json_output))
            }

            Command::Tip { .. } | Command::Send => {
                let intent = if flow.form().confirm_open {
                    None
                } else {
                    Some(self.open_confirmation(flow).await?)
                };
                let recipient = intent
                    .as_ref()
                    .map(|i| i.recipient.clone())
                    .unwrap_or_else(|| flow.form().recipient.trim().to_string());
                let micro = display::parse_stx_amount(&flow.form().amount).ok();

                let outcome = flow.confirm().await?;
                if json_output {
                    return Ok(display::format_outcome_json(&outcome, micro, &recipient));
                }
                let mut output = display::format_outcome(&outcome, micro, &recipient);
                if !matches!(outcome, TransactionOutcome::Success { .. }) {
                    output.push_str("\nThe form was kept; type 'send' to try again.");
                }
                Ok(output)
            }

            Command::Status => {
                flow.settle_lookup().await;
                Ok(form_output(flow, json_output))
            }

            Command::Clear => {
                flow.clear();
                if json_output {
                    Ok(display::format_form_json(flow.form()))
                } else {
                    Ok("Form cleared.".to_string())
                }
            }

            Command::Address => {
                let address = service.session().wallet_address();
                if json_output {
                    Ok(display::format_address_json(address))
                } else {
                    Ok(address
                        .map(str::to_string)
                        .unwrap_or_else(|| "No wallet connected. Start with --address <address>.".to_string()))
                }
            }

            Command::Register { email } => {
                let response = service.register_email(email).await?;
                if json_output {
                    return Ok(serde_json::json!({
                        "email": email.trim().to_lowercase(),
                        "message": response.message,
                        "pending_verification": true,
                    })
                    .to_string());
                }
                let message = response
                    .message
                    .unwrap_or_else(|| "Verification code sent.".to_string());
                Ok(format!("{message}\nCheck your inbox, then run 'verify <code>'."))
            }

            Command::Verify { code } => {
                let message = service.verify_email(code).await?;
                if json_output {
                    Ok(serde_json::json!({ "verified": true, "message": message }).to_string())
                } else {
                    Ok(message)
                }
            }

            Command::Verified => {
                let users = service.verified_users().await?;
                if json_output {
                    Ok(serde_json::to_string(&users)?)
                } else {
                    Ok(display::format_verified_users(&users))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}

fn form_output(flow: &TipFlow, json_output: bool) -> String {
    if json_output {
        display::format_form_json(flow.form())
    } else {
        display::format_form(flow.form())
    }
}
