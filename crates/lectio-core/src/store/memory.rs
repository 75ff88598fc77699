//! In-memory document store.
//!
//! Backs tests and headless embedding. A single mutex serializes all
//! writes, which also provides the per-document write serialization the
//! gateway contract promises.

use super::{
    Cursor, Document, DocumentStore, Fields, Query, QueryPage, StoreError, StoredDoc,
    derive_doc_id, order_key, resolve_fields, wall_clock_us,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct DocRecord {
    seq: i64,
    fields: Document,
}

#[derive(Debug, Default)]
struct Inner {
    collections: BTreeMap<String, BTreeMap<String, DocRecord>>,
    next_seq: i64,
    last_ts_us: i64,
}

impl Inner {
    /// Strictly increasing write clock: wall time, nudged forward when two
    /// writes land in the same microsecond.
    fn next_ts(&mut self) -> i64 {
        let now = wall_clock_us();
        self.last_ts_us = now.max(self.last_ts_us + 1);
        self.last_ts_us
    }

    fn next_seq(&mut self) -> i64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Heap-only [`DocumentStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|record| record.fields.clone()))
    }

    fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let ts = inner.next_ts();
        let seq = inner.next_seq();
        let resolved = resolve_fields(fields, ts);

        let docs = inner.collections.entry(collection.to_string()).or_default();
        let record = docs.entry(id.to_string()).or_insert_with(|| DocRecord {
            seq,
            fields: Document::new(),
        });
        record.fields.extend(resolved);
        Ok(())
    }

    fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let mut inner = self.lock()?;
        let ts = inner.next_ts();
        let seq = inner.next_seq();
        let id = derive_doc_id(collection, seq, ts);
        let resolved = resolve_fields(fields, ts);

        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), DocRecord {
                seq,
                fields: resolved,
            });
        Ok(id)
    }

    fn query(&self, query: &Query) -> Result<QueryPage, StoreError> {
        let inner = self.lock()?;
        let Some(docs) = inner.collections.get(&query.collection) else {
            return Ok(QueryPage::default());
        };

        let mut ordered: Vec<(i64, i64, &String, &Document)> = docs
            .iter()
            .map(|(id, record)| (order_key(&record.fields), record.seq, id, &record.fields))
            .collect();
        ordered.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));

        let mut page = Vec::new();
        let mut last_position = None;
        for (ts, seq, id, fields) in ordered {
            if let Some(cursor) = query.start_after
                && !cursor.admits(ts, seq)
            {
                continue;
            }
            if !query.filters.iter().all(|filter| filter.matches(fields)) {
                continue;
            }

            page.push(StoredDoc {
                id: id.clone(),
                fields: fields.clone(),
            });
            last_position = Some((ts, seq));

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
