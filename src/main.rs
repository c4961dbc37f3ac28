//! Lunar trading bot CLI

use clap::{Parser, Subcommand};
use enzyme_lunar_bot::{Network, Result, Scheduler, TradingSession};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lunar-bot")]
#[command(about = "Unattended lunar-phase trading bot for Enzyme vaults")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trading loop
    Run {
        /// Network to trade on (ethereum, polygon)
        #[arg(short, long, default_value = "ethereum")]
        network: Network,

        /// Seconds between iterations
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,

        /// Build and log swap calls without submitting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the current lunar age and trade signal
    Signal,

    /// Price a swap route against Uniswap V3
    Quote {
        /// Outgoing token address
        #[arg(long)]
        outgoing: String,

        /// Incoming token address
        #[arg(long)]
        incoming: String,

        /// Outgoing amount in the token's smallest unit
        #[arg(long)]
        amount: String,

        /// Network (ethereum, polygon)
        #[arg(short, long, default_value = "ethereum")]
        network: Network,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            network,
            interval_secs,
            dry_run,
        } => run_loop(network, interval_secs, dry_run).await?,
        Commands::Signal => show_signal(),
        Commands::Quote {
            outgoing,
            incoming,
            amount,
            network,
        } => run_quote(outgoing, incoming, amount, network).await?,
    }

    Ok(())
}

async fn run_loop(network: Network, interval_secs: u64, dry_run: bool) -> Result<()> {
    tracing::info!(
        network = network.name(),
        interval_secs,
        dry_run,
        "starting trading bot"
    );

    // Startup configuration failures are the only fatal path
    let session = TradingSession::connect(network, dry_run).await?;

    let scheduler = Scheduler::new(Duration::from_secs(interval_secs));
    scheduler.run(|| session.run_iteration()).await;

    Ok(())
}

fn show_signal() {
    use enzyme_lunar_bot::signal;

    let age = signal::lunar_age(chrono::Utc::now());
    let trade = signal::evaluate(age);
    println!("Lunar age: {age:.2} days");
    println!("Signal: {trade:?}");
}

async fn run_quote(
    outgoing: String,
    incoming: String,
    amount: String,
    network: Network,
) -> Result<()> {
    use alloy::primitives::{Address, U256};
    use alloy::providers::{Provider, ProviderBuilder};
    use enzyme_lunar_bot::config::{BotConfig, Deployment};
    use enzyme_lunar_bot::route::{RouteOracle, UniswapV3Quoter};
    use enzyme_lunar_bot::Error;
    use std::str::FromStr;

    let outgoing = Address::from_str(&outgoing)
        .map_err(|e| Error::Config(format!("Invalid outgoing address: {e}")))?;
    let incoming = Address::from_str(&incoming)
        .map_err(|e| Error::Config(format!("Invalid incoming address: {e}")))?;
    let amount =
        U256::from_str(&amount).map_err(|e| Error::Config(format!("Invalid amount: {e}")))?;

    let url: url::Url = BotConfig::rpc_url_from_env(network)?
        .parse()
        .map_err(|e| Error::Config(format!("Invalid RPC URL: {e}")))?;
    let provider = ProviderBuilder::new().connect_http(url).erased();

    let quoter = UniswapV3Quoter::new(provider, Deployment::for_network(network).quoter);
    let route = quoter.quote(outgoing, incoming, amount).await?;

    println!("Output amount: {}", route.output_amount);
    println!("Path: {:?}", route.hop_addresses);
    println!("Fees: {:?}", route.hop_fees);

    Ok(())
}
