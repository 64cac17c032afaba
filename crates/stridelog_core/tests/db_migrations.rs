use rusqlite::Connection;
use stridelog_core::db::migrations::{apply_migrations, latest_version, schema_version};
use stridelog_core::db::{open_db, open_db_in_memory, DbError};
use stridelog_core::{FlatStore, SqliteFlatStore};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "kv_slots");
}

#[test]
fn migrating_an_up_to_date_database_is_a_no_op() {
    let mut conn = open_db_in_memory().unwrap();

    let started_at = apply_migrations(&mut conn).unwrap();

    assert_eq!(started_at, latest_version());
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn fresh_database_migrates_from_version_zero() {
    let mut conn = Connection::open_in_memory().unwrap();

    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "kv_slots");
}

#[test]
fn slot_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stridelog.sqlite3");

    let conn_first = open_db(&path).unwrap();
    SqliteFlatStore::new(&conn_first)
        .write_slot("workouts", r#"{"version":1,"workouts":[]}"#)
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    assert_eq!(
        SqliteFlatStore::new(&conn_second)
            .read_slot("workouts")
            .unwrap()
            .as_deref(),
        Some(r#"{"version":1,"workouts":[]}"#)
    );
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
