//! Fluent query builder over a [`Store`].
//!
//! Mirrors the shape of hosted-database client libraries:
//!
//! ```ignore
//! let rows = db.from("wishs").select("*").eq("name", "alice").execute().await?;
//! let guest = db.from("guests").insert(&row).select("*").single().execute().await?;
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::types::{Row, StoreError, StoreResult};
use crate::store::Store;

/// Equality filter on a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

/// A select against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    /// Column list in PostgREST syntax, `*` for all.
    pub columns: String,
    pub filters: Vec<Filter>,
}

/// What an insert hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Returning {
    /// Nothing.
    Minimal,
    /// The inserted rows, restricted to the given columns.
    Representation(String),
}

/// An insert into one table.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub table: String,
    pub rows: Vec<Row>,
    pub returning: Returning,
}

/// Cloneable database handle shared by handlers.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn Store>,
}

impl Database {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Start a query against `table`.
    pub fn from(&self, table: &str) -> TableRef<'_> {
        TableRef {
            store: self.store.as_ref(),
            table: table.to_string(),
        }
    }
}

pub struct TableRef<'a> {
    store: &'a dyn Store,
    table: String,
}

impl<'a> TableRef<'a> {
    pub fn select(self, columns: &str) -> SelectBuilder<'a> {
        SelectBuilder {
            store: self.store,
            query: SelectQuery {
                table: self.table,
                columns: columns.to_string(),
                filters: Vec::new(),
            },
        }
    }

    /// Insert one object or an array of objects.
    pub fn insert<T: Serialize + ?Sized>(self, rows: &T) -> InsertBuilder<'a> {
        InsertBuilder {
            store: self.store,
            table: self.table,
            rows: to_rows(rows),
            returning: Returning::Minimal,
        }
    }
}

fn to_rows<T: Serialize + ?Sized>(rows: &T) -> StoreResult<Vec<Row>> {
    match serde_json::to_value(rows)? {
        serde_json::Value::Object(row) => Ok(vec![row]),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(row) => Ok(row),
                other => Err(StoreError::Decode(format!("insert row is not an object: {other}"))),
            })
            .collect(),
        other => Err(StoreError::Decode(format!("insert payload is not an object: {other}"))),
    }
}

fn expect_single(mut rows: Vec<Row>) -> StoreResult<Row> {
    if rows.len() == 1 {
        Ok(rows.remove(0))
    } else {
        Err(StoreError::NotSingle(rows.len()))
    }
}

fn decode<T: DeserializeOwned>(row: Row) -> StoreResult<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(row))?)
}

pub struct SelectBuilder<'a> {
    store: &'a dyn Store,
    query: SelectQuery,
}

impl<'a> SelectBuilder<'a> {
    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.query.filters.push(Filter {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Expect exactly one row.
    pub fn single(self) -> SingleSelect<'a> {
        SingleSelect { inner: self }
    }

    pub fn query(&self) -> &SelectQuery {
        &self.query
    }

    pub async fn execute(self) -> StoreResult<Vec<Row>> {
        self.store.select(&self.query).await
    }
}

pub struct SingleSelect<'a> {
    inner: SelectBuilder<'a>,
}

impl SingleSelect<'_> {
    pub async fn execute(self) -> StoreResult<Row> {
        expect_single(self.inner.execute().await?)
    }

    pub async fn execute_as<T: DeserializeOwned>(self) -> StoreResult<T> {
        decode(self.execute().await?)
    }
}

pub struct InsertBuilder<'a> {
    store: &'a dyn Store,
    table: String,
    rows: StoreResult<Vec<Row>>,
    returning: Returning,
}

impl<'a> InsertBuilder<'a> {
    /// Ask for the inserted rows back.
    pub fn select(mut self, columns: &str) -> Self {
        self.returning = Returning::Representation(columns.to_string());
        self
    }

    /// Expect exactly one inserted row back. Implies `select("*")` if no
    /// columns were requested.
    pub fn single(mut self) -> SingleInsert<'a> {
        if self.returning == Returning::Minimal {
            self.returning = Returning::Representation("*".to_string());
        }
        SingleInsert { inner: self }
    }

    pub async fn execute(self) -> StoreResult<Vec<Row>> {
        let query = InsertQuery {
            table: self.table,
            rows: self.rows?,
            returning: self.returning,
        };
        self.store.insert(&query).await
    }
}

pub struct SingleInsert<'a> {
    inner: InsertBuilder<'a>,
}

impl SingleInsert<'_> {
    pub async fn execute(self) -> StoreResult<Row> {
        expect_single(self.inner.execute().await?)
    }

    pub async fn execute_as<T: DeserializeOwned>(self) -> StoreResult<T> {
        decode(self.execute().await?)
    }
}
