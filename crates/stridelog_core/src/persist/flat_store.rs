//! Durable flat key/value slot storage.
//!
//! # Responsibility
//! - Read, overwrite and clear named text slots.
//! - Keep SQL details behind the `FlatStore` contract.
//!
//! # Invariants
//! - A write replaces the whole slot value; there are no partial updates.
//! - Slot keys are opaque strings.

use crate::db::DbError;
use log::error;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of the durable storage collaborator.
#[derive(Debug)]
pub enum StorageError {
    /// Backend refused or failed the operation for a non-database reason.
    Unavailable { slot: String, reason: String },
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { slot, reason } => {
                write!(f, "storage unavailable for slot `{slot}`: {reason}")
            }
            Self::Db(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable { .. } => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named text slots overwritten in full.
pub trait FlatStore {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()>;
    fn clear_slot(&self, key: &str) -> StorageResult<()>;
}

/// SQLite-backed slot storage over the `kv_slots` table.
pub struct SqliteFlatStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFlatStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FlatStore for SqliteFlatStore<'_> {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .inspect_err(|err| {
                error!(
                    "event=slot_read module=persist status=error slot={} error={}",
                    key, err
                );
            })?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn
            .execute(
                "INSERT INTO kv_slots (key, value)
                 VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )
            .inspect_err(|err| {
                error!(
                    "event=slot_write module=persist status=error slot={} error={}",
                    key, err
                );
            })?;
        Ok(())
    }

    fn clear_slot(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local slot storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryFlatStore {
    slots: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryFlatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a slot without counting it as a write.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Number of successful `write_slot` calls.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl FlatStore for MemoryFlatStore {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn clear_slot(&self, key: &str) -> StorageResult<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
