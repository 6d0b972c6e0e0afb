//! Crime Alert wallet onboarding CLI.
//!
//! ```text
//! crime-alert [--config FILE] <command>
//!
//!   connect [--watch]   switch/add network, request accounts, bind contract
//!   dashboard           open the user dashboard (connects if a wallet answers)
//!   admin               connect, then open the admin dashboard (admin only)
//!   network             print the network descriptor sent to the wallet
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};

use crime_alert::config::{load_config, AppConfig};
use crime_alert::lifecycle::{wait_for_signal, Shutdown};
use crime_alert::observability::{logging, metrics};
use crime_alert::routing::{login, AdminIdentity, ConsoleNotifier, Dispatch, LoginAction, UrlNavigator};
use crime_alert::session::Bootstrapper;
use crime_alert::wallet::{RpcWallet, WalletProvider};

#[derive(Parser)]
#[command(name = "crime-alert")]
#[command(about = "Wallet onboarding for the Crime Alert reporting dApp", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment overrides still apply.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the wallet and print the session
    Connect {
        /// Keep tracking account changes until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Open the user dashboard, connecting the wallet if one is available
    Dashboard,
    /// Connect and open the admin dashboard
    Admin,
    /// Print the network descriptor used for wallet_addEthereumChain
    Network,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        chain_id = config.network.chain_id,
        wallet_endpoint = %config.wallet.endpoint,
        "crime-alert v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    match cli.command {
        Commands::Network => {
            println!("{}", serde_json::to_string_pretty(&config.network.descriptor())?);
        }
        Commands::Connect { watch } => {
            let bootstrapper = build_bootstrapper(&config).await?;
            let shutdown = Shutdown::new();

            if watch {
                let (_, watcher) = bootstrapper.connect(shutdown.subscribe()).await?;
                print_session(&bootstrapper)?;
                wait_for_signal().await;
                shutdown.trigger();
                watcher.join().await;
                print_session(&bootstrapper)?;
            } else {
                bootstrapper.bootstrap().await?;
                print_session(&bootstrapper)?;
            }
        }
        Commands::Dashboard => {
            let bootstrapper = build_bootstrapper(&config).await?;
            open(&config, &bootstrapper, LoginAction::User).await?;
        }
        Commands::Admin => {
            let bootstrapper = build_bootstrapper(&config).await?;
            if let Dispatch::Rejected(e) = open(&config, &bootstrapper, LoginAction::Admin).await? {
                return Err(e.into());
            }
        }
    }

    Ok(())
}

async fn build_bootstrapper(config: &AppConfig) -> Result<Arc<Bootstrapper>, Box<dyn std::error::Error>> {
    let contract_address: Address = config.contract.address.parse()?;
    let wallet = RpcWallet::detect(&config.wallet)
        .await
        .map(|w| Arc::new(w) as Arc<dyn WalletProvider>);
    if wallet.is_none() {
        tracing::error!(endpoint = %config.wallet.endpoint, "No wallet provider detected");
    }

    Ok(Arc::new(Bootstrapper::new(
        wallet,
        config.network.descriptor(),
        contract_address,
    )))
}

async fn open(
    config: &AppConfig,
    bootstrapper: &Bootstrapper,
    action: LoginAction,
) -> Result<Dispatch, Box<dyn std::error::Error>> {
    let navigator = UrlNavigator::new(config.app.base_url.parse()?);
    let admin = AdminIdentity::new(&config.admin.address);
    Ok(login(action, bootstrapper, &admin, &navigator, &ConsoleNotifier).await?)
}

fn print_session(bootstrapper: &Bootstrapper) -> Result<(), Box<dyn std::error::Error>> {
    let session = bootstrapper.session();
    println!("{}", serde_json::to_string_pretty(session.as_ref())?);
    Ok(())
}
