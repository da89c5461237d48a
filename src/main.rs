use alloy_primitives::{Address, U256};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use swapper::application::deployment::{DeploymentConfig, bootstrap};
use swapper::application::engine::ExchangeEngine;
use swapper::application::host::Host;
use swapper::application::proxy::UpgradeableProxy;
use swapper::application::registry::CodeRegistry;
use swapper::application::session::SwapSession;
use swapper::domain::ports::StateStoreBox;
use swapper::domain::units::parse_units;
use swapper::infrastructure::in_memory::InMemoryStateStore;
use swapper::infrastructure::token::Erc20Ledger;
use swapper::interfaces::csv::balance_writer::BalanceWriter;
use swapper::interfaces::csv::scenario_reader::ScenarioReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario CSV file (`caller, op, value, args`)
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Account that deploys the token, engine and proxy
    #[arg(long, default_value = "0x1111111111111111111111111111111111111111")]
    deployer: Address,

    /// Decimal precision of the target token
    #[arg(long, default_value_t = 18)]
    decimals: u8,

    /// Token supply minted to the deployer, in whole tokens
    #[arg(long, default_value = "1000000000")]
    supply: Decimal,

    /// Tokens moved into the proxy after deployment, in whole tokens
    #[arg(long, default_value = "1000000")]
    reserve: Decimal,

    /// Rate set by `initialize`
    #[arg(long, default_value_t = swapper::application::engine::DEFAULT_RATE)]
    default_rate: u64,
}

fn open_store(db_path: Option<PathBuf>) -> Result<StateStoreBox> {
    match db_path {
        Some(db_path) => open_persistent_store(db_path),
        None => Ok(Box::new(InMemoryStateStore::new())),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_persistent_store(db_path: PathBuf) -> Result<StateStoreBox> {
    let store = swapper::infrastructure::rocksdb::RocksDBStore::open(db_path).into_diagnostic()?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_persistent_store(db_path: PathBuf) -> Result<StateStoreBox> {
    warn!(
        path = %db_path.display(),
        "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
    );
    Ok(Box::new(InMemoryStateStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let default_rate = U256::from(cli.default_rate);
    let store = open_store(cli.db_path)?;

    let mut registry = CodeRegistry::new(Erc20Ledger::boxed_from_record);
    registry.register(Arc::new(ExchangeEngine::new(default_rate)));
    registry.register(Arc::new(UpgradeableProxy));

    let mut session = match store.load().await.into_diagnostic()? {
        Some(checkpoint) => {
            info!(proxy = %checkpoint.deployment.proxy, "Resuming from checkpoint");
            SwapSession::from_checkpoint(checkpoint, &registry).into_diagnostic()?
        }
        None => {
            let config = DeploymentConfig {
                deployer: cli.deployer,
                reserve: parse_units(cli.reserve, cli.decimals).into_diagnostic()?,
                default_rate,
            };
            let supply = parse_units(cli.supply, cli.decimals).into_diagnostic()?;
            let token = Erc20Ledger::with_supply("DEXE", cli.decimals, cli.deployer, supply);

            let mut host = Host::new();
            let deployment = bootstrap(&mut host, &config, Box::new(token)).into_diagnostic()?;
            SwapSession::new(host, deployment)
        }
    };

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ScenarioReader::new(file);
    for (line, record) in reader.records().enumerate() {
        let step = match record.and_then(|record| record.into_step(session.deployment())) {
            Ok(step) => step,
            Err(e) => {
                warn!(line = line + 1, "Error reading step: {}", e);
                continue;
            }
        };
        match session.process_step(step) {
            Ok(output) => info!(line = line + 1, ?output, "Step applied"),
            Err(e) => warn!(line = line + 1, "Error processing step: {}", e),
        }
    }

    store.save(session.checkpoint()).await.into_diagnostic()?;

    let balances = session.balances().into_diagnostic()?;
    let decimals = session.token_decimals().into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_balances(&balances, decimals).into_diagnostic()?;

    Ok(())
}
