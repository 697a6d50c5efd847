//! Engine-level write commands.
//!
//! Collaborators that queue or transport writes (web handlers, batch import)
//! describe them as `EngineCommand` values and hand them to
//! `apply_engine_command` together with their `RequestContext`.

#![allow(clippy::result_large_err)]

use crate::commands::patient::{self, PatientCreated};
use riskwatch_core::audit::Reconciliation;
use riskwatch_core::core_types::RequestContext;
use riskwatch_core::errors::ExError;
use riskwatch_core::model::FieldMap;
use riskwatch_store::errors::Result;
use rusqlite::Connection;

/// Engine-level commands that write patient data.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Register a patient from an initial field map.
    PatientCreate { fields: FieldMap },
    /// Reconcile a proposed field map against the stored patient.
    PatientUpdate {
        patient_id: String,
        fields: FieldMap,
    },
    /// Remove a patient and its audit trail.
    PatientDelete { patient_id: String },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    PatientCreate(PatientCreated),
    PatientUpdate(Reconciliation),
    PatientDelete { patient_id: String },
}

/// Apply an engine command.
///
/// Errors carry the context's request and trace ids.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    ctx: &RequestContext,
) -> Result<EngineCommandResult> {
    tracing::debug!(
        request_id = %ctx.request_id,
        command = cmd_name(&cmd),
        "applying engine command"
    );

    let result = match cmd {
        EngineCommand::PatientCreate { fields } => {
            patient::patient_create(conn, &fields).map(EngineCommandResult::PatientCreate)
        }
        EngineCommand::PatientUpdate { patient_id, fields } => {
            patient::patient_reconcile(conn, &patient_id, &fields)
                .map(EngineCommandResult::PatientUpdate)
        }
        EngineCommand::PatientDelete { patient_id } => patient::patient_delete(conn, &patient_id)
            .map(|()| EngineCommandResult::PatientDelete { patient_id }),
    };

    result.map_err(|e| with_context(e, ctx))
}

fn cmd_name(cmd: &EngineCommand) -> &'static str {
    match cmd {
        EngineCommand::PatientCreate { .. } => "patient_create",
        EngineCommand::PatientUpdate { .. } => "patient_update",
        EngineCommand::PatientDelete { .. } => "patient_delete",
    }
}

fn with_context(err: ExError, ctx: &RequestContext) -> ExError {
    let err = err.with_request_id(ctx.request_id.clone());
    match &ctx.trace_id {
        Some(trace_id) => err.with_trace_id(trace_id.clone()),
        None => err,
    }
}
