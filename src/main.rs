//! Greeter terminal front-end.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────┐    ┌────────────────────┐    ┌───────────────────────────┐
//!   │  greeter │───▶│ SessionController  │───▶│ WalletConnector (EIP-1193)│──▶ wallet
//!   │   CLI    │◀───│  snapshot / events │    ├───────────────────────────┤
//!   └──────────┘    └────────────────────┘───▶│ ChainProvider (zkSync RPC)│──▶ node
//!                                             ├───────────────────────────┤
//!                                             │ GreeterContract           │
//!                                             └───────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};

use greeter_session::blockchain::Eip1193Wallet;
use greeter_session::config::{load_config, GreeterConfig};
use greeter_session::observability::init_logging;
use greeter_session::session::{SessionController, SessionError, SessionSnapshot};

#[derive(Parser)]
#[command(name = "greeter")]
#[command(about = "Read and update the Greeter contract, paying fees in any listed token", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "greeter.toml")]
    config: PathBuf,

    /// Origin-chain address of the fee token (native asset by default).
    #[arg(short, long, global = true)]
    token: Option<Address>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the greeting, fee token, balance and expected fee
    Show,
    /// Quote the fee for setting a greeting
    Fee { greeting: String },
    /// Show the balance in the fee token
    Balance,
    /// Change the greeting
    Set { greeting: String },
}

fn load_or_default(path: &Path) -> Result<GreeterConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(load_config(path)?)
    } else {
        Ok(GreeterConfig::default())
    }
}

fn print_quotes(snapshot: &SessionSnapshot) {
    match &snapshot.selected_token {
        Some(token) => {
            println!("Fee token: {} ({})", token.symbol, token.origin_address);
            println!("Balance: {}", snapshot.balance_display());
            println!("Expected fee: {}", snapshot.fee_display());
        }
        None => println!("{}", snapshot.action_label()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;

    init_logging(&config.observability.log_level);

    tracing::info!(
        config = %cli.config.display(),
        chain_id = config.network.chain_id,
        tokens = config.tokens.len(),
        "Configuration loaded"
    );

    let wallet = Eip1193Wallet::from_config(&config)?;
    let session = SessionController::from_config(&config, Arc::new(wallet));

    if let Err(e) = session.connect().await {
        if let SessionError::WrongNetwork { expected, .. } = &e {
            eprintln!("Please switch network to zkSync (chain {})!", expected);
        }
        return Err(e.into());
    }

    if let Some(token) = cli.token {
        session.select_token(token).await?;
    }

    match cli.command {
        Commands::Show => {
            let snapshot = session.snapshot();
            println!("Greeter says: {}", snapshot.greeting);
            print_quotes(&snapshot);
        }
        Commands::Fee { greeting } => {
            session.set_draft(greeting);
            session.refresh_fee().await;
            println!("Expected fee: {}", session.snapshot().fee_display());
        }
        Commands::Balance => {
            println!("Balance: {}", session.snapshot().balance_display());
        }
        Commands::Set { greeting } => {
            session.set_draft(greeting.clone());
            let tx_hash = session.submit_greeting(&greeting).await?;
            let snapshot = session.snapshot();
            println!("Transaction: {}", tx_hash);
            println!("Greeter says: {}", snapshot.greeting);
            print_quotes(&snapshot);
        }
    }

    Ok(())
}
