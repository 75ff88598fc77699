//! `SQLite`-backed document store.
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` to allow concurrent readers while writers append
//! - `busy_timeout = 5s` to reduce transient lock failures under contention
//! - `foreign_keys = ON` kept on out of habit even though the schema is a
//!   single table
//!
//! Every merge-write runs in its own transaction, which serializes writes
//! per document and makes partial updates atomic.

use super::{
    Cursor, Document, DocumentStore, Fields, Query, QueryPage, StoreError, StoredDoc,
    derive_doc_id, order_key, resolve_fields, wall_clock_us,
};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS documents (
  collection TEXT NOT NULL,
  doc_id     TEXT NOT NULL,
  seq        INTEGER NOT NULL,
  order_us   INTEGER NOT NULL DEFAULT 0,
  body       TEXT NOT NULL,
  PRIMARY KEY (collection, doc_id)
);

CREATE INDEX IF NOT EXISTS documents_by_order
  ON documents (collection, order_us DESC, seq DESC);

CREATE TABLE IF NOT EXISTS store_meta (
  id         INTEGER PRIMARY KEY CHECK (id = 1),
  next_seq   INTEGER NOT NULL,
  last_ts_us INTEGER NOT NULL
);

INSERT OR IGNORE INTO store_meta (id, next_seq, last_ts_us) VALUES (1, 0, 0);
";

/// File-backed [`DocumentStore`] implementation.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store database, apply runtime pragmas, and
    /// migrate the schema to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if opening/configuring/migrating the database fails.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        configure_connection(&conn)?;
        migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory store (used by tests).
    ///
    /// # Errors
    ///
    /// Returns an error if opening or migrating fails.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        configure_connection(&conn)?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(SCHEMA_SQL)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

/// Advance the persisted write clock and sequence inside a transaction.
fn next_write_position(conn: &Connection) -> Result<(i64, i64), StoreError> {
    let (last_ts, last_seq): (i64, i64) = conn.query_row(
        "SELECT last_ts_us, next_seq FROM store_meta WHERE id = 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let ts = wall_clock_us().max(last_ts + 1);
    let seq = last_seq + 1;
    conn.execute(
        "UPDATE store_meta SET last_ts_us = ?1, next_seq = ?2 WHERE id = 1",
        params![ts, seq],
    )?;
    Ok((ts, seq))
}

fn parse_body(raw: &str) -> Result<Document, StoreError> {
    Ok(serde_json::from_str(raw)?)
}

impl DocumentStore for SqliteStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        body.as_deref().map(parse_body).transpose()
    }

    fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let (ts, new_seq) = next_write_position(&tx)?;
        let resolved = resolve_fields(fields, ts);

        let existing: Option<(i64, String)> = tx
            .query_row(
                "SELECT seq, body FROM documents WHERE collection = ?1 AND doc_id = ?2",
                params![collection, id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (seq, mut doc) = match existing {
            Some((seq, body)) => (seq, parse_body(&body)?),
            None => (new_seq, Document::new()),
        };
        doc.extend(resolved);

        tx.execute(
            "INSERT OR REPLACE INTO documents (collection, doc_id, seq, order_us, body)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![collection, id, seq, order_key(&doc), serde_json::to_string(&doc)?],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let (ts, seq) = next_write_position(&tx)?;
        let id = derive_doc_id(collection, seq, ts);
        let doc = resolve_fields(fields, ts);

        tx.execute(
            "INSERT INTO documents (collection, doc_id, seq, order_us, body)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![collection, id, seq, order_key(&doc), serde_json::to_string(&doc)?],
        )?;

        tx.commit()?;
        Ok(id)
    }

    fn query(&self, query: &Query) -> Result<QueryPage, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT doc_id, seq, order_us, body FROM documents
             WHERE collection = ?1
             ORDER BY order_us DESC, seq DESC",
        )?;

        let rows = stmt.query_map(params![query.collection], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut page = Vec::new();
        let mut last_position = None;
        for row in rows {
            let (id, seq, order_us, body) = row?;
            if let Some(cursor) = query.start_after
                && !cursor.admits(order_us, seq)
            {
                continue;
            }

            let fields = parse_body(&body)?;
            if !query.filters.iter().all(|filter| filter.matches(&fields)) {
                continue;
            }

            page.push(StoredDoc { id, fields });
            last_position = Some((order_us, seq));

            if query.limit.is_some_and(|limit| page.len() == limit) {
                break;
            }
        }

        let next_cursor = match (query.limit, last_position) {
            (Some(limit), Some((ts, seq))) if page.len() == limit => Some(Cursor::new(ts, seq)),
            _ => None,
        };

        Ok(QueryPage {
            docs: page,
            next_cursor,
        })
    }
}
