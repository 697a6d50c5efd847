//! RiskWatch CLI
//!
//! Command-line interface for RiskWatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use riskwatch_core::logging_facility;
use riskwatch_core::RiskWatchConfig;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "riskwatch")]
#[command(about = "RiskWatch - clinical risk scoring with audited patient updates", long_about = None)]
struct Cli {
    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(long, global = true, env = "RISKWATCH_DB")]
    db: Option<PathBuf>,

    /// Log profile: development, production or test
    #[arg(long, global = true, env = "RISKWATCH_LOG")]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a field map without storing anything
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Patient operations
    Patient(commands::patient::PatientArgs),
    /// Audit history, grouped into update batches
    History(commands::history::HistoryArgs),
    /// Patient counts per risk tier and recent admissions
    Summary(commands::summary::SummaryArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = RiskWatchConfig::resolve(cli.db, cli.log.as_deref())?;
    logging_facility::init(config.log_profile());

    match cli.command {
        Commands::Evaluate(args) => commands::evaluate::execute(args),
        Commands::Patient(args) => commands::patient::execute(args, &config),
        Commands::History(args) => commands::history::execute(args, &config),
        Commands::Summary(args) => commands::summary::execute(args, &config),
    }
}
