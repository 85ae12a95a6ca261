//! In-process table store.
//!
//! Behaves like a freshly created hosted table: every inserted row gets an
//! auto-increment `id`, selects filter by column equality and project the
//! requested columns. Used for local runs and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::store::query::{Filter, InsertQuery, Returning, SelectQuery};
use crate::store::types::{Row, StoreError, StoreResult};
use crate::store::Store;

#[derive(Default)]
struct Inner {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    next_id: AtomicU64,
    failure: Mutex<Option<String>>,
}

/// Cloneable in-memory store. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `message`, or recover with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        let mut failure = self.inner.failure.lock().expect("memory store mutex poisoned");
        *failure = message.map(str::to_string);
    }

    /// Snapshot of a table's rows in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        let tables = self.inner.tables.lock().expect("memory store mutex poisoned");
        tables.get(table).cloned().unwrap_or_default()
    }

    fn check_available(&self) -> StoreResult<()> {
        let failure = self.inner.failure.lock().expect("memory store mutex poisoned");
        match failure.as_ref() {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

fn value_matches(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Bool(b)) => b.to_string() == expected,
        Some(Value::Null) | None => expected == "null",
        Some(_) => false,
    }
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| value_matches(row.get(&f.column), &f.value))
}

/// Keep only the listed columns; `*` keeps everything.
fn project(row: &Row, columns: &str) -> Row {
    if columns.trim() == "*" {
        return row.clone();
    }
    columns
        .split(',')
        .map(str::trim)
        .filter_map(|col| row.get(col).map(|v| (col.to_string(), v.clone())))
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Row>> {
        self.check_available()?;
        let tables = self.inner.tables.lock().expect("memory store mutex poisoned");
        let rows = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .map(|row| project(row, &query.columns))
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn insert(&self, query: &InsertQuery) -> StoreResult<Vec<Row>> {
        self.check_available()?;
        let mut tables = self.inner.tables.lock().expect("memory store mutex poisoned");
        let table = tables.entry(query.table.clone()).or_default();

        let mut inserted = Vec::with_capacity(query.rows.len());
        for row in &query.rows {
            let mut stored = Row::new();
            let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            stored.insert("id".to_string(), Value::from(id));
            stored.extend(row.clone());
            table.push(stored.clone());
            inserted.push(stored);
        }

        match &query.returning {
            Returning::Minimal => Ok(Vec::new()),
            Returning::Representation(columns) => {
                Ok(inserted.iter().map(|row| project(row, columns)).collect())
            }
        }
    }
}
