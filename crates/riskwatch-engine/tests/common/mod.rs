#![allow(dead_code)]

use riskwatch_core::FieldMap;
use rusqlite::Connection;
use tempfile::TempDir;

pub fn setup_db() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let conn = riskwatch_store::db::open_and_migrate(temp_dir.path().join("test.db")).unwrap();
    (temp_dir, conn)
}

pub fn fields(value: serde_json::Value) -> FieldMap {
    serde_json::from_value(value).unwrap()
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}
