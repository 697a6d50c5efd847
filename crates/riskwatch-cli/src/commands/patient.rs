//! Patient commands
//!
//! Writes go through `apply_engine_command`; reads call the engine's query
//! helpers directly.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use riskwatch_core::core_types::RequestContext;
use riskwatch_core::RiskWatchConfig;
use riskwatch_engine::commands::patient::{patient_list, patient_show};
use riskwatch_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

use super::{open_db, print_json, read_field_map};

#[derive(Debug, Args)]
pub struct PatientArgs {
    #[command(subcommand)]
    pub command: PatientCommand,
}

#[derive(Debug, Subcommand)]
pub enum PatientCommand {
    /// Register a patient from a JSON field map
    Create {
        #[arg(long, short)]
        input: PathBuf,
    },
    /// Apply proposed field values to a patient
    Update {
        #[arg(long)]
        id: String,
        #[arg(long, short)]
        input: PathBuf,
    },
    Show {
        #[arg(long)]
        id: String,
    },
    List,
    /// Delete a patient and its audit trail
    Delete {
        #[arg(long)]
        id: String,
    },
}

pub fn execute(
    args: PatientArgs,
    config: &RiskWatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = open_db(config)?;
    let ctx = RequestContext::new();

    let cmd = match args.command {
        PatientCommand::Show { id } => return print_json(&patient_show(&conn, &id)?),
        PatientCommand::List => return print_json(&patient_list(&conn)?),
        PatientCommand::Create { input } => EngineCommand::PatientCreate {
            fields: read_field_map(&input)?,
        },
        PatientCommand::Update { id, input } => EngineCommand::PatientUpdate {
            patient_id: id,
            fields: read_field_map(&input)?,
        },
        PatientCommand::Delete { id } => EngineCommand::PatientDelete { patient_id: id },
    };

    match apply_engine_command(cmd, &mut conn, &ctx)? {
        EngineCommandResult::PatientCreate(created) => print_json(&created),
        EngineCommandResult::PatientUpdate(outcome) => print_json(&outcome),
        EngineCommandResult::PatientDelete { patient_id } => {
            print_json(&serde_json::json!({ "deleted": patient_id }))
        }
    }
}
