#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("to") | Some("recipient") => {
            "to <address>\n  Set the tip recipient. The address is checked against the\n  registry after a short pause; unverified addresses can still be tipped.\n  Example: to ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG\n  Alias: recipient".to_string()
        }
        Some("amount") | Some("amt") => {
            "amount <stx>\n  Set the tip amount in STX (up to 6 decimals).\n  Example: amount 10.5\n  Alias: amt".to_string()
        }
        Some("tip") => {
            "tip <address> <stx>\n  Fill the form and send in one step.\n  Your wallet is asked to approve the contract call.\n  Example: tip ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG 2.5".to_string()
        }
        Some("send") | Some("confirm") => {
            "send\n  Send the tip currently in the form.\n  Alias: confirm".to_string()
        }
        Some("status") | Some("form") => {
            "status\n  Show recipient, amount and registry status.\n  Alias: form".to_string()
        }
        Some("clear") | Some("reset") => {
            "clear\n  Reset the form.\n  Alias: reset".to_string()
        }
        Some("address") | Some("addr") => {
            "address\n  Show the connected wallet address.\n  Alias: addr".to_string()
        }
        Some("register") => {
            "register <email>\n  Link an email to the connected wallet.\n  A verification code is sent to the address.".to_string()
        }
        Some("verify") => {
            "verify <code>\n  Confirm the code from the registration email.".to_string()
        }
        Some("verified") | Some("users") => {
            "verified\n  List users with a verified email.\n  Alias: users".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Leave tipstack.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list."),
        None => {
            "Available commands:\n\
             \n\
             \x20 to <address>       Set the recipient\n\
             \x20 amount <stx>       Set the amount\n\
             \x20 tip <addr> <stx>   Fill the form and send\n\
             \x20 send               Send the tip in the form\n\
             \x20 status             Show the form\n\
             \x20 clear              Reset the form\n\
             \x20 address            Show the connected wallet\n\
             \x20 register <email>   Link an email to your wallet\n\
             \x20 verify <code>      Confirm your email\n\
             \x20 verified           List verified users\n\
             \x20 help [cmd]         Show help for a command\n\
             \x20 exit               Exit\n\
             \n\
             Type 'help <command>' for detailed help on a specific command."
                .to_string()
        }
    }
}
