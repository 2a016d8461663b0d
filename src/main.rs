use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, ValueEnum};
use coin_exchange::application::engine::ExchangeEngine;
use coin_exchange::config::{DEFAULT_INITIAL_QUANTITY, ExchangeConfig, INITIAL_QUANTITY_ENV};
use coin_exchange::domain::coin::{Breakdown, Strategy};
use coin_exchange::domain::ports::TransactionLedgerBox;
use coin_exchange::domain::transaction::TransactionFilter;
use coin_exchange::error::Result as ExchangeResult;
use coin_exchange::infrastructure::in_memory::InMemoryLedger;
use coin_exchange::interfaces::csv::command_reader::{Command, CommandReader};
use coin_exchange::interfaces::csv::report_writer::{CommandOutcome, ReportWriter};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Report {
    Inventory,
    Bills,
    History,
    Summary,
    Status,
    /// One row per input command with its change or error
    Results,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Path to persistent transaction ledger (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Coins of each denomination at start and after every reset
    #[arg(long, env = INITIAL_QUANTITY_ENV, default_value_t = DEFAULT_INITIAL_QUANTITY)]
    initial_quantity: u32,

    /// Report written to stdout once all commands have run
    #[arg(long, value_enum, default_value_t = Report::Inventory)]
    report: Report,

    /// History: earliest exchange time to include (RFC 3339)
    #[arg(long)]
    start: Option<DateTime<Utc>>,

    /// History: latest exchange time to include (RFC 3339)
    #[arg(long)]
    end: Option<DateTime<Utc>>,

    /// History: smallest amount to include
    #[arg(long)]
    min_amount: Option<u32>,

    /// History: largest amount to include
    #[arg(long)]
    max_amount: Option<u32>,

    /// History: only minimal (true) or maximal (false) exchanges
    #[arg(long, action = ArgAction::Set)]
    minimal: Option<bool>,
}

impl Cli {
    fn history_filter(&self) -> TransactionFilter {
        TransactionFilter {
            start: self.start,
            end: self.end,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            strategy: self.minimal.map(Strategy::from_minimal),
        }
    }
}

fn open_ledger(db_path: Option<PathBuf>) -> Result<TransactionLedgerBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let ledger = coin_exchange::infrastructure::rocksdb::RocksDBLedger::open(path)
                .into_diagnostic()?;
            Ok(Box::new(ledger))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory ledger."
            );
            Ok(Box::new(InMemoryLedger::new()))
        }
        None => Ok(Box::new(InMemoryLedger::new())),
    }
}

/// Runs one command. Exchanges return the coins dispensed.
async fn run_command(
    engine: &ExchangeEngine,
    command: Command,
) -> ExchangeResult<Option<Breakdown>> {
    match command {
        Command::Exchange(request) => engine.exchange(request).await.map(Some),
        Command::AddCoins { coin, quantity } => {
            engine.add_coins(coin, quantity).await.map(|_| None)
        }
        Command::RemoveCoins { coin, quantity } => {
            engine.remove_coins(coin, quantity).await.map(|_| None)
        }
        Command::Reset => {
            engine.reset_inventory().await;
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_ansi(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = ExchangeConfig::with_initial_quantity(cli.initial_quantity);
    info!(initial_quantity = config.initial_quantity, "Starting coin exchange");

    let engine = ExchangeEngine::new(config.initial_quantity, open_ledger(cli.db_path.clone())?);

    // Process commands
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    let mut outcomes = Vec::new();
    for (row, command) in (1u64..).zip(reader.commands()) {
        let (name, result) = match command {
            Ok(command) => {
                let name = command.name();
                match run_command(&engine, command).await {
                    Ok(Some(breakdown)) => {
                        info!(row, %breakdown, "Dispensed change");
                        (name, breakdown.to_string())
                    }
                    Ok(None) => (name, "ok".to_string()),
                    Err(e) => {
                        warn!("Error processing command: {}", e);
                        (name, format!("error: {}", e))
                    }
                }
            }
            Err(e) => {
                warn!("Error reading command: {}", e);
                ("invalid", format!("error: {}", e))
            }
        };
        outcomes.push(CommandOutcome {
            row,
            command: name.to_string(),
            result,
        });
    }

    // Output the requested report
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    let written = match cli.report {
        Report::Inventory => writer.write_inventory(&engine.inventory().await),
        Report::Bills => writer.write_bills(&engine.bills_inventory().await),
        Report::History => {
            let filter = cli.history_filter();
            let history = if filter.is_empty() {
                engine.history().await
            } else {
                engine.filter_history(&filter).await
            };
            writer.write_history(&history.into_diagnostic()?)
        }
        Report::Summary => writer.write_summary(&engine.summary().await.into_diagnostic()?),
        Report::Status => writer.write_status(&engine.status().await),
        Report::Results => writer.write_results(&outcomes),
    };
    written.into_diagnostic()?;

    Ok(())
}
