use clap::Args;
use riskwatch_core::RiskWatchConfig;
use riskwatch_engine::commands::patient::dashboard;
use riskwatch_store::RECENT_ADMISSIONS_LIMIT;

use super::{open_db, print_json};

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// How many recent admissions to list
    #[arg(long, default_value_t = RECENT_ADMISSIONS_LIMIT)]
    pub recent: u32,
}

pub fn execute(
    args: SummaryArgs,
    config: &RiskWatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(config)?;
    print_json(&dashboard(&conn, args.recent)?)
}
