// Integration tests for the migration runner

#![allow(clippy::unwrap_used, clippy::expect_used)]

use riskwatch_core::ExErrorKind;
use riskwatch_store::db;
use riskwatch_store::migrations::{applied_migrations, apply_migrations};
use tempfile::TempDir;

#[test]
fn test_fresh_database_gets_schema() {
    // Given: An empty file-backed database
    let dir = TempDir::new().unwrap();
    let mut conn = db::open(dir.path().join("nested/riskwatch.db")).unwrap();
    db::configure(&conn).unwrap();

    // When: Migrations are applied
    apply_migrations(&mut conn).unwrap();

    // Then: Both tables exist and the migration is recorded with a checksum
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('patients', 'audit_log')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 2);

    let applied = applied_migrations(&conn).unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].migration_id, "001_initial_schema");
    assert_eq!(applied[0].checksum.len(), 64);
}

#[test]
fn test_reapplying_is_a_noop() {
    let mut conn = db::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    let before = applied_migrations(&conn).unwrap();

    apply_migrations(&mut conn).unwrap();

    assert_eq!(applied_migrations(&conn).unwrap(), before);
}

#[test]
fn test_edited_migration_is_rejected() {
    // Given: A migrated database whose recorded checksum no longer matches
    let mut conn = db::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = 'bogus' WHERE migration_id = '001_initial_schema'",
        [],
    )
    .unwrap();

    // When: Migrations run again
    let err = apply_migrations(&mut conn).unwrap_err();

    // Then: The drift is reported
    assert_eq!(err.kind(), ExErrorKind::ChecksumMismatch);
    assert!(err.message().contains("001_initial_schema"));
}

#[test]
fn test_open_and_migrate_reopens_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("riskwatch.db");

    drop(db::open_and_migrate(&path).unwrap());
    let conn = db::open_and_migrate(&path).unwrap();

    assert_eq!(applied_migrations(&conn).unwrap().len(), 1);
}
