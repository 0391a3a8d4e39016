//! Cross-chain OFT transfer CLI
//!
//! `send` runs the full quote-before-send pipeline and prints the
//! transaction hash; `status` reconciles a previously submitted
//! transaction; `networks` lists configured destinations.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use oft_sender::transfer::DEFAULT_LZ_RECEIVE_GAS;
use oft_sender::{Config, ConfirmationChecker, ConfirmationStatus, NonceGate, SendArgs};

#[derive(Parser)]
#[command(name = "oft-sender")]
#[command(about = "Send tokens across chains through an OFT contract", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote and submit an outbound transfer
    Send {
        /// Recipient address on the destination chain
        #[arg(long)]
        to: String,

        /// Destination network name
        #[arg(long)]
        dst_network: String,

        /// Amount to transfer, in token decimals
        #[arg(long)]
        amount: String,

        /// Slippage floor; defaults to the full amount
        #[arg(long)]
        min_amount: Option<String>,

        /// Destination gas for lzReceive
        #[arg(long, default_value_t = DEFAULT_LZ_RECEIVE_GAS)]
        gas_limit: u128,

        /// Native currency to drop to the recipient, in wei
        #[arg(long)]
        native_drop: Option<u128>,

        /// Block confirmations to wait for
        #[arg(long)]
        confirmations: Option<u64>,

        /// Confirmation patience window in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Check the confirmation state of a submitted transaction
    Status {
        /// Transaction hash (0x-prefixed)
        #[arg(long)]
        tx_hash: String,

        /// Confirmations required to report confirmed
        #[arg(long)]
        confirmations: Option<u64>,
    },

    /// List configured destination networks
    Networks,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load()?;

    match cli.command {
        Commands::Send {
            to,
            dst_network,
            amount,
            min_amount,
            gas_limit,
            native_drop,
            confirmations,
            timeout_secs,
        } => {
            let mut config = config;
            if let Some(confirmations) = confirmations {
                config.confirmations = confirmations;
            }
            if let Some(timeout_secs) = timeout_secs {
                config.timeout_secs = timeout_secs;
            }

            let gate = Arc::new(NonceGate::new());
            let client = oft_sender::transfer::connect(&config, gate)?;

            let args = SendArgs {
                dst_network,
                recipient: to,
                amount,
                min_amount,
                gas_limit,
                native_drop,
            };

            match client.send(&args).await {
                Ok(result) => {
                    println!("Send tx confirmed: {}", result.tx_hash);
                    println!("See: https://layerzeroscan.com/tx/{}", result.tx_hash);
                }
                Err(e) => {
                    let funds = if e.funds_at_risk() {
                        "funds may have left the signer; reconcile before retrying"
                    } else {
                        "no funds left the signer; safe to retry"
                    };
                    eprintln!("Transfer failed ({}): {}", e.category(), e);
                    eprintln!("{funds}");
                    std::process::exit(e.exit_code());
                }
            }
        }

        Commands::Status {
            tx_hash,
            confirmations,
        } => {
            let checker = ConfirmationChecker::new(
                config.rpc_url.clone(),
                confirmations.unwrap_or(config.confirmations),
            )?;
            match checker.check(&tx_hash).await? {
                ConfirmationStatus::Pending => {
                    println!("{tx_hash}: pending (no receipt yet)")
                }
                ConfirmationStatus::WaitingConfirmations(n) => {
                    println!("{tx_hash}: mined, {n} confirmation(s) so far")
                }
                ConfirmationStatus::Confirmed { block } => {
                    println!("{tx_hash}: confirmed in block {block}")
                }
                ConfirmationStatus::Failed => {
                    println!("{tx_hash}: reverted on-chain")
                }
            }
        }

        Commands::Networks => {
            let directory = config.directory()?;
            for (name, eid) in directory.iter() {
                println!("{name}\t{eid}");
            }
        }
    }

    Ok(())
}
