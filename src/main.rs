use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vehicle_ledger::{InMemoryLedger, LedgerConfig, VehicleContract};

#[derive(Parser)]
#[command(name = "vehicle-ledger")]
#[command(about = "Run vehicle lifecycle transactions against a local ledger file")]
struct Cli {
    /// Snapshot file holding the committed ledger state
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[arg(long, global = true)]
    channel: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a transaction and commit it
    Invoke {
        function: String,
        args: Vec<String>,
    },
    /// Evaluate a transaction without committing
    Query {
        function: String,
        args: Vec<String>,
    },
    /// List committed keys
    Dump,
    /// List the transaction functions of the contract
    Functions,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = LedgerConfig::from_env().context("failed to load configuration")?;
    if let Some(path) = cli.snapshot {
        config = config.snapshot_path(path);
    }
    if let Some(channel) = cli.channel.as_deref() {
        config = config.channel(channel);
    }

    let ledger = InMemoryLedger::open(config.clone()).context("failed to open ledger")?;
    let contract = VehicleContract::new(config);

    match cli.command {
        Command::Invoke { function, args } => invoke(&ledger, &contract, &function, &args).await,
        Command::Query { function, args } => {
            let payload = contract
                .evaluate(&ledger, &function, &args)
                .await
                .with_context(|| format!("query '{}' failed", function))?;
            print_payload(&payload);
            Ok(())
        }
        Command::Dump => dump(&ledger).await,
        Command::Functions => {
            for function in contract.transactions() {
                println!("{}", function);
            }
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vehicle_ledger=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn invoke(
    ledger: &InMemoryLedger,
    contract: &VehicleContract,
    function: &str,
    args: &[String],
) -> Result<()> {
    let mut events = ledger.subscribe();

    let submission = contract
        .submit(ledger, function, args)
        .await
        .with_context(|| format!("invoke '{}' failed", function))?;

    info!(
        tx_id = %submission.receipt.tx_id,
        height = submission.receipt.height,
        writes = submission.receipt.writes,
        "transaction committed"
    );

    while let Ok(event) = events.try_recv() {
        eprintln!(
            "event {}/{} {}: {}",
            event.channel,
            event.chaincode,
            event.name,
            event.payload_str()
        );
    }
    print_payload(&submission.payload);
    Ok(())
}

async fn dump(ledger: &InMemoryLedger) -> Result<()> {
    let state = ledger.state().await;
    println!("height {}", state.height);

    for (key, entry) in state.public.iter() {
        println!("{} v{} {}", key, entry.version, String::from_utf8_lossy(&entry.value));
    }
    for (collection, entries) in state.private.iter() {
        for (key, entry) in entries.iter() {
            println!(
                "[{}] {} v{} {}",
                collection,
                key,
                entry.version,
                String::from_utf8_lossy(&entry.value)
            );
        }
    }
    Ok(())
}

fn print_payload(payload: &[u8]) {
    if !payload.is_empty() {
        println!("{}", String::from_utf8_lossy(payload));
    }
}
