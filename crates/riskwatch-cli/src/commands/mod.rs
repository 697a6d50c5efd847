//! Subcommand implementations and their shared I/O helpers

pub mod evaluate;
pub mod history;
pub mod patient;
pub mod summary;

use std::io::Read;
use std::path::Path;

use riskwatch_core::{FieldMap, RiskWatchConfig};
use rusqlite::Connection;
use serde::Serialize;

/// Read a JSON field map from a file, or from stdin when `input` is `-`
pub fn read_field_map(input: &Path) -> Result<FieldMap, Box<dyn std::error::Error>> {
    let text = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| format!("cannot read {}: {}", input.display(), e))?
    };
    let fields: FieldMap = serde_json::from_str(&text)
        .map_err(|e| format!("input must be a JSON object of fields: {}", e))?;
    Ok(fields)
}

/// Open the configured database and bring its schema up to date
pub fn open_db(config: &RiskWatchConfig) -> Result<Connection, Box<dyn std::error::Error>> {
    Ok(riskwatch_store::db::open_and_migrate(config.db_path())?)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
