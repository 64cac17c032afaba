//! Slot schema migrations.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps for the `kv_slots` table.
//! - Run the steps a database is missing inside one transaction.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - `PRAGMA user_version` equals the last step applied.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// Ordered schema steps; index `i` holds version `i + 1`.
const STEPS: &[&str] = &[include_str!("0001_init.sql")];

/// Schema version produced by running every step.
pub fn latest_version() -> u32 {
    STEPS.len() as u32
}

/// Reads the schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings `conn` to [`latest_version`] and returns the version it started at.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is ahead of this build.
/// - `Migration` naming the step that failed; nothing is committed then.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }
    if found == latest {
        debug!("event=db_migrate module=db status=skip version={found}");
        return Ok(found);
    }

    let tx = conn.transaction()?;
    for (index, sql) in STEPS.iter().enumerate().skip(found as usize) {
        run_step(&tx, index as u32 + 1, sql)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={found} to_version={latest}");
    Ok(found)
}

fn run_step(tx: &Transaction<'_>, version: u32, sql: &str) -> DbResult<()> {
    tx.execute_batch(sql)
        .and_then(|()| tx.pragma_update(None, "user_version", version))
        .map_err(|source| DbError::Migration { version, source })?;
    debug!("event=db_migrate_step module=db status=ok version={version}");
    Ok(())
}
