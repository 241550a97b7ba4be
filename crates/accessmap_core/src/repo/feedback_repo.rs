//! Feedback store contract and SQLite slot implementation.
//!
//! # Responsibility
//! - Persist the full feedback collection as one JSON array value in one
//!   named slot row.
//! - Keep SQL and JSON details inside the core persistence boundary.
//!
//! # Invariants
//! - `save` writes the whole collection in a single atomic statement.
//! - `load` never fails on malformed slot content; it returns an empty
//!   collection and leaves the stored bytes untouched.
//! - Unknown fields inside persisted records are ignored on read.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::feedback::FeedbackRecord;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

/// Slot row holding the user feedback collection.
pub const FEEDBACK_SLOT: &str = "feedback_entries";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for the feedback slot store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Connection has not been migrated to the expected schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Migrated connection is missing a required table.
    MissingRequiredTable(&'static str),
    /// The collection could not be serialized for writing.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::Encode(err) => write!(f, "feedback collection could not be encoded: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for the persisted feedback collection.
///
/// The whole collection is the unit of persistence: there is no per-record
/// addressing, and callers replace the full sequence on every mutation.
pub trait FeedbackStore {
    /// Loads the persisted collection in insertion order.
    ///
    /// Returns an empty collection when no slot exists yet or when the slot
    /// content cannot be decoded.
    fn load(&self) -> StoreResult<Vec<FeedbackRecord>>;

    /// Atomically replaces the persisted collection.
    fn save(&mut self, records: &[FeedbackRecord]) -> StoreResult<()>;
}

/// SQLite-backed slot store for feedback records.
pub struct SqliteFeedbackStore {
    conn: Connection,
}

impl SqliteFeedbackStore {
    /// Wraps a migrated connection after readiness checks.
    ///
    /// The store owns the connection for its whole lifetime, so one store
    /// is also one writer.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Opens (and migrates) a database file and wraps it as a store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(crate::db::open_db(path)?)
    }

    /// Opens an in-memory store; used by tests and previews.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(crate::db::open_db_in_memory()?)
    }
}

impl FeedbackStore for SqliteFeedbackStore {
    fn load(&self) -> StoreResult<Vec<FeedbackRecord>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE name = ?1;",
                [FEEDBACK_SLOT],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = value else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                // Degrade to empty without rewriting the slot, so the bytes
                // stay available for offline inspection.
                warn!(
                    "event=feedback_load module=repo status=error error_code=slot_decode_failed slot={FEEDBACK_SLOT} error={err}"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, records: &[FeedbackRecord]) -> StoreResult<()> {
        let started_at = Instant::now();
        let encoded = serde_json::to_string(records).map_err(StoreError::Encode)?;

        self.conn.execute(
            "INSERT INTO slots (name, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![FEEDBACK_SLOT, encoded],
        )?;

        info!(
            "event=feedback_save module=repo status=ok slot={FEEDBACK_SLOT} count={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let slots_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'slots'
         );",
        [],
        |row| row.get(0),
    )?;
    if slots_exists != 1 {
        return Err(StoreError::MissingRequiredTable("slots"));
    }

    Ok(())
}
