use std::{
    io::{self, Write as _},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use rarity_portal::{
    DefaultPortalClient, PortalClient,
    config::{PortalConfig, RPC_URL_ENV},
    printer::StdoutPrinter,
};
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tracing_subscriber::EnvFilter;

const WELCOME: &str = "Welcome to Rarity Portal. Type help below for actions.";

#[derive(Parser)]
#[command(name = "rarity-portal", version)]
#[command(about = "Summon, adventure and name Rarity summoners from the terminal")]
struct Cli {
    /// JSON config file
    #[arg(short, long, env = "RARITY_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint
    #[arg(long, env = RPC_URL_ENV)]
    rpc_url: Option<String>,

    /// File remembering the last used connector
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Skip the chain id check when connecting a wallet
    #[arg(long)]
    no_verify_chain: bool,

    /// Run a single command and exit, e.g. `summoners list`
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rarity-portal")
        .join("storage.json")
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = PortalConfig::load(cli.config.as_deref())?;
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }
    if cli.no_verify_chain {
        config.verify_chain = false;
    }
    config.storage_path = Some(
        cli.storage
            .or(config.storage_path)
            .unwrap_or_else(default_storage_path),
    );

    let portal: DefaultPortalClient = PortalClient::new(&config)?;
    portal.startup().await?;

    let printer = StdoutPrinter;
    if !cli.command.is_empty() {
        let completed = portal.run(&cli.command.join(" "), &printer).await;
        return Ok(if completed {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    println!("{WELCOME}");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "exit" | "quit" => break,
            input => {
                portal.run(input, &printer).await;
            }
        }
        prompt()?;
    }

    Ok(ExitCode::SUCCESS)
}
