use anyhow::{anyhow, bail, Result};

use super::Command;
use crate::display;

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let mut parts = input.splitn(3, char::is_whitespace);
        let cmd = parts.next().unwrap_or_default().to_lowercase();
        let arg1 = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());
        let arg2 = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

        match cmd.as_str() {
            "to" | "recipient" => {
                let recipient = arg1
                    .ok_or_else(|| anyhow!("Missing recipient. Usage: to <address>"))?;
                Ok(Command::To {
                    recipient: recipient.to_string(),
                })
            }

            "amount" | "amt" => {
                let amount =
                    arg1.ok_or_else(|| anyhow!("Missing amount. Usage: amount <stx>"))?;
                check_amount(amount)?;
                Ok(Command::Amount {
                    amount: amount.to_string(),
                })
            }

            "tip" => {
                let recipient = arg1
                    .ok_or_else(|| anyhow!("Missing recipient. Usage: tip <address> <stx>"))?;
                let amount =
                    arg2.ok_or_else(|| anyhow!("Missing amount. Usage: tip <address> <stx>"))?;
                check_amount(amount)?;
                Ok(Command::Tip {
                    recipient: recipient.to_string(),
                    amount: amount.to_string(),
                })
            }

            "send" | "confirm" => Ok(Command::Send),

            "status" | "form" => Ok(Command::Status),

            "clear" | "reset" => Ok(Command::Clear),

            "address" | "addr" => Ok(Command::Address),

            "register" => {
                let email = arg1
                    .ok_or_else(|| anyhow!("Missing email. Usage: register <email>"))?;
                Ok(Command::Register {
                    email: email.to_string(),
                })
            }

            "verify" => {
                let code =
                    arg1.ok_or_else(|| anyhow!("Missing code. Usage: verify <code>"))?;
                Ok(Command::Verify {
                    code: code.to_string(),
                })
            }

            "verified" | "users" => Ok(Command::Verified),

            "help" | "?" => Ok(Command::Help {
                command: arg1.map(|s| s.to_string()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

fn check_amount(amount: &str) -> Result<()> {
    let micro = display::parse_stx_amount(amount)
        .map_err(|e| anyhow!("Invalid amount '{amount}': {e}"))?;
    if micro == 0 {
        bail!("Cannot tip 0 STX.");
    }
    Ok(())
}
