/// REPL shell: Reedline-based interactive tipping session.
use anyhow::Result;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use tipstack_core::commands::Command;
use tipstack_core::recipient::shorten_address;
use tipstack_core::service::TipService;

pub async fn run_repl(mut service: TipService) -> Result<()> {
    println!("TipStack v{}", env!("CARGO_PKG_VERSION"));
    println!("Network: {}", service.config().network);
    println!("Contract: {}", service.config().contract);
    println!();

    let prompt_str = match service.session().wallet_address() {
        Some(address) => {
            println!("Wallet: {address}");
            format!("[tipstack {}]", shorten_address(address))
        }
        None => {
            println!("No wallet connected. Restart with --address <address> to send tips.");
            "[tipstack]".to_string()
        }
    };
    if service.needs_registration() {
        println!("This wallet has no email yet. Run 'register <email>' so others can find you.");
    }
    if let Some(email) = service.pending_verification() {
        println!("Waiting for the code sent to {email}. Run 'verify <code>'.");
    }
    println!("Type 'help' for a list of commands.");
    println!();

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(prompt_str),
        DefaultPromptSegment::Empty,
    );

    let commands: Vec<String> = vec![
        "to".into(),
        "recipient".into(),
        "amount".into(),
        "amt".into(),
        "tip".into(),
        "send".into(),
        "confirm".into(),
        "status".into(),
        "form".into(),
        "clear".into(),
        "reset".into(),
        "address".into(),
        "addr".into(),
        "register".into(),
        "verify".into(),
        "verified".into(),
        "users".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    let mut flow = service.new_flow();

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        match cmd.confirmation_prompt(&mut flow).await {
                            Ok(Some(prompt_msg)) => {
                                if !prompt_confirm(&prompt_msg) {
                                    flow.dismiss_confirmation();
                                    println!("Cancelled.");
                                    continue;
                                }
                            }
                            Ok(None) => {}
                            Err(e) => {
                                eprintln!("Error: {e}");
                                continue;
                            }
                        }
                        match cmd.execute(&mut service, &mut flow, false).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => {
                                eprintln!("Error: {e}");
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}

fn prompt_confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}
