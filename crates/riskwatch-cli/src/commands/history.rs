//! Audit history
//!
//! Usage: riskwatch history --id <ID> | --all

use clap::Args;
use riskwatch_core::RiskWatchConfig;
use riskwatch_engine::commands::patient::{audit_log, patient_history};

use super::{open_db, print_json};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Patient whose trail to show, grouped into update batches
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub id: Option<String>,

    /// Every audit record across patients, newest first, ungrouped
    #[arg(long)]
    pub all: bool,
}

pub fn execute(
    args: HistoryArgs,
    config: &RiskWatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(config)?;
    match args.id {
        Some(id) => print_json(&patient_history(&conn, &id)?),
        None => print_json(&audit_log(&conn)?),
    }
}
