//! Document store gateway.
//!
//! All persistence goes through the [`DocumentStore`] trait: typed key-value
//! documents grouped into named collections, merge-style partial updates,
//! append with generated ids, and ordered cursor-paginated queries. Two
//! implementations ship: [`memory::MemoryStore`] for tests and headless use,
//! and [`sqlite::SqliteStore`] backing the CLI.
//!
//! # Ordering
//!
//! Queries return documents ordered by the resolved [`ORDER_FIELD`] value
//! descending, ties broken by insertion sequence descending. That order is
//! total and stable, so consecutive pages never duplicate or skip documents
//! under a stable data set. The [`Cursor`] encodes the order key of the last
//! returned document and is opaque to callers.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde_json::Value;
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

/// The document field queries order by (descending).
///
/// Stored as an integer microsecond value resolved from
/// [`FieldValue::ServerTimestamp`] at write time.
pub const ORDER_FIELD: &str = "timestamp";

/// A stored document: flat field map with JSON values.
pub type Document = BTreeMap<String, Value>;

/// Write-side field map; values may be server-resolved sentinels.
pub type Fields = BTreeMap<String, FieldValue>;

/// A value written to a document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A literal JSON value stored as-is.
    Json(Value),
    /// Placeholder resolved by the store to its write-time clock.
    ///
    /// Feed ordering uses the resolved value, never the caller's clock.
    ServerTimestamp,
}

impl FieldValue {
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::ServerTimestamp => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Json(Value::from(value))
    }
}

/// Errors surfaced by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("invalid cursor token '{0}'")]
    BadCursor(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Equality filter over one document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub equals: Value,
}

impl Filter {
    pub fn equals(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            equals: value.into(),
        }
    }

    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field) == Some(&self.equals)
    }
}

/// An ordered query over one collection.
///
/// Filters combine with AND semantics. Results are ordered by
/// [`ORDER_FIELD`] descending with insertion-sequence tie-break; a
/// `start_after` cursor resumes strictly after the document it names.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub limit: Option<usize>,
    pub start_after: Option<Cursor>,
}

impl Query {
    #[must_use]
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filtered(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn limited(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn starting_after(mut self, cursor: Option<Cursor>) -> Self {
        self.start_after = cursor;
        self
    }
}

/// Opaque resume point in a query's total order.
///
/// Encodes `(order key, insertion seq)` of the last returned document; the
/// token form is what callers persist and pass back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    ts_us: i64,
    seq: i64,
}

impl Cursor {
    pub(crate) const fn new(ts_us: i64, seq: i64) -> Self {
        Self { ts_us, seq }
    }

    /// True when `(ts_us, seq)` sorts strictly after this cursor in the
    /// descending order.
    pub(crate) const fn admits(self, ts_us: i64, seq: i64) -> bool {
        ts_us < self.ts_us || (ts_us == self.ts_us && seq < self.seq)
    }

    /// The token callers hold between pages.
    #[must_use]
    pub fn token(self) -> String {
        format!("{:x}.{:x}", self.ts_us, self.seq)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl FromStr for Cursor {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || StoreError::BadCursor(s.to_string());
        let (ts, seq) = s.split_once('.').ok_or_else(bad)?;
        let ts_us = i64::from_str_radix(ts, 16).map_err(|_| bad())?;
        let seq = i64::from_str_radix(seq, 16).map_err(|_| bad())?;
        Ok(Self { ts_us, seq })
    }
}

/// One document in a query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDoc {
    pub id: String,
    pub fields: Document,
}

/// One page of a query result.
///
/// `next_cursor` is present iff the page is full: a short page signals
/// end-of-feed and callers must stop paginating.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub docs: Vec<StoredDoc>,
    pub next_cursor: Option<Cursor>,
}

/// The persistence gateway consumed by progress, feed, and comment logic.
///
/// Implementations serialize concurrent writes to the same document, so
/// merge-style partial updates cannot lose fields.
pub trait DocumentStore {
    /// Fetch one document. Absence is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge fields into a document, creating it if absent. Unspecified
    /// fields are preserved; specified fields are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Append a new document with a generated id, returning the id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Run an ordered, cursor-paginated query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn query(&self, query: &Query) -> Result<QueryPage, StoreError>;
}

/// Resolve write-side fields into stored JSON, substituting the clock value
/// for every [`FieldValue::ServerTimestamp`] sentinel.
pub(crate) fn resolve_fields(fields: Fields, ts_us: i64) -> Document {
    fields
        .into_iter()
        .map(|(key, value)| {
            let resolved = match value {
                FieldValue::Json(v) => v,
                FieldValue::ServerTimestamp => Value::from(ts_us),
            };
            (key, resolved)
        })
        .collect()
}

/// The order key of a stored document (missing field sorts last).
pub(crate) fn order_key(doc: &Document) -> i64 {
    doc.get(ORDER_FIELD).and_then(Value::as_i64).unwrap_or(0)
}

/// Derive a short content-based id for an appended document.
pub(crate) fn derive_doc_id(collection: &str, seq: i64, ts_us: i64) -> String {
    let digest = blake3::hash(format!("{collection}:{seq}:{ts_us}").as_bytes());
    digest.to_hex()[..12].to_string()
}

/// Current wall clock in microseconds since the Unix epoch.
pub(crate) fn wall_clock_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

#[cfg(test)]
mod tests {
    use super::{Cursor, Document, FieldValue, Fields, derive_doc_id, order_key, resolve_fields};
    use serde_json::{Value, json};
    use std::str::FromStr;

    #[test]
    fn cursor_token_roundtrips() {
        let cursor = Cursor::new(1_700_000_123_456_789, 42);
        let token = cursor.token();
        assert_eq!(Cursor::from_str(&token).expect("parses"), cursor);
    }

    #[test]
    fn cursor_rejects_garbage_tokens() {
        for raw in ["", "abc", "1.2.3", "xyz.q", "12:34"] {
            assert!(Cursor::from_str(raw).is_err(), "{raw} should be invalid");
        }
    }

    #[test]
    fn cursor_admits_strictly_after_only() {
        let cursor = Cursor::new(100, 5);
        assert!(cursor.admits(99, 9));
        assert!(cursor.admits(100, 4));
        assert!(!cursor.admits(100, 5));
        assert!(!cursor.admits(100, 6));
        assert!(!cursor.admits(101, 0));
    }

    #[test]
    fn resolve_substitutes_server_timestamp() {
        let mut fields = Fields::new();
        fields.insert("timestamp".into(), FieldValue::ServerTimestamp);
        fields.insert("body".into(), FieldValue::from("hello"));

        let doc = resolve_fields(fields, 777);
        assert_eq!(doc.get("timestamp"), Some(&json!(777)));
        assert_eq!(doc.get("body"), Some(&Value::String("hello".into())));
        assert_eq!(order_key(&doc), 777);
    }

    #[test]
    fn order_key_defaults_when_missing() {
        assert_eq!(order_key(&Document::new()), 0);
    }

    #[test]
    fn derived_ids_are_short_and_distinct() {
        let a = derive_doc_id("activity", 1, 1_000);
        let b = derive_doc_id("activity", 2, 1_000);
        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
    }
}
