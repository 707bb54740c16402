mod provider;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tipstack_core::commands::Command;
use tipstack_core::config::{Network, TipConfig};
use tipstack_core::service::TipService;
use tipstack_core::session::SessionStore;
use tracing_subscriber::EnvFilter;

use crate::provider::PromptWallet;

#[derive(Parser)]
#[command(name = "tipstack", about = "TipStack: tip Stacks creators from the terminal", version)]
pub(crate) struct Cli {
    /// Connected wallet address (default: the one stored in the session file)
    #[arg(long, env = "TIPSTACK_ADDRESS")]
    address: Option<String>,

    /// Network: testnet or mainnet
    #[arg(long, env = "TIPSTACK_NETWORK", default_value = "testnet")]
    network: Network,

    /// Backend base URL
    #[arg(long, env = "TIPSTACK_BACKEND_URL")]
    backend_url: Option<String>,

    /// Tip contract as ADDRESS.NAME (required on mainnet)
    #[arg(long, env = "TIPSTACK_CONTRACT")]
    contract: Option<String>,

    /// Session file (default: <data dir>/tipstack/session.json)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. "debug" or "tipstack_core=trace" (default: $RUST_LOG, else "warn")
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn tip_config(&self) -> Result<TipConfig> {
        let mut config = TipConfig {
            network: self.network,
            ..TipConfig::default()
        };
        if let Some(url) = &self.backend_url {
            config = config.with_backend_url(url)?;
        }
        match &self.contract {
            Some(contract) => config = config.with_contract(contract)?,
            None if self.network == Network::Mainnet => bail!(
                "There is no default tip contract on mainnet. Pass --contract ADDRESS.NAME or set TIPSTACK_CONTRACT."
            ),
            None => {}
        }
        Ok(config)
    }

    fn session_store(&self) -> Result<SessionStore> {
        match &self.session_file {
            Some(path) => SessionStore::open_at(path.clone()),
            None => SessionStore::open(),
        }
    }
}

/// Logs go to stderr so command output on stdout stays parseable.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = cli.tip_config()?;
    let store = cli.session_store()?;
    let service =
        TipService::bootstrap(config, Arc::new(PromptWallet), cli.address.as_deref(), store)
            .await?;

    if let Some(cmd_str) = &cli.cmd {
        // One-shot mode
        run_oneshot(&cli, service, cmd_str).await
    } else {
        // REPL mode
        repl::run_repl(service).await
    }
}

async fn run_oneshot(cli: &Cli, mut service: TipService, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }

    let mut flow = service.new_flow();
    let output = command.execute(&mut service, &mut flow, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
