//! Score a field map
//!
//! Usage: riskwatch evaluate --input <FILE|->

use std::path::PathBuf;

use clap::Args;
use riskwatch_core::evaluate_fields;

use super::{print_json, read_field_map};

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// JSON field map file, or `-` for stdin
    #[arg(long, short)]
    pub input: PathBuf,
}

/// Missing or uncoercible fields score as their safe defaults.
pub fn execute(args: EvaluateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let fields = read_field_map(&args.input)?;
    print_json(&evaluate_fields(&fields))
}
