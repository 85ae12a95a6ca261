//! PostgREST client for the hosted database.
//!
//! # Responsibilities
//! - Translate select/insert queries into REST calls on `/rest/v1/<table>`
//! - Attach the project API key
//! - Decode rows and error payloads
//!
//! # Design Decisions
//! - No request timeout and no retries; the caller awaits the database
//! - Error bodies (`{ code, message, details, hint }`) are surfaced verbatim so
//!   handlers can pass the message through

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;

use crate::observability::metrics;
use crate::store::query::{InsertQuery, Returning, SelectQuery};
use crate::store::types::{Row, StoreError, StoreResult};
use crate::store::Store;

const PREFER: &str = "prefer";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    /// `<project url>/rest/v1/`
    base_url: Url,
}

impl PostgrestStore {
    /// Create a client for the project at `url` using `api_key`.
    pub fn new(url: &str, api_key: &str) -> StoreResult<Self> {
        let mut base_url: Url = url
            .parse()
            .map_err(|e| StoreError::Config(format!("Invalid database URL '{}': {}", url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let base_url = base_url
            .join("rest/v1/")
            .map_err(|e| StoreError::Config(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key).map_err(|e| StoreError::Config(e.to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| StoreError::Config(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn table_url(&self, table: &str) -> StoreResult<Url> {
        self.base_url
            .join(table)
            .map_err(|e| StoreError::Config(format!("Invalid table name '{}': {}", table, e)))
    }

    async fn read_rows(response: Response) -> StoreResult<Vec<Row>> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let parsed: Option<ApiErrorBody> = serde_json::from_slice(&body).ok();
            let (code, message) = match parsed {
                Some(b) => (b.code, b.message.unwrap_or_default()),
                None => (None, String::from_utf8_lossy(&body).into_owned()),
            };
            return Err(StoreError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Store for PostgrestStore {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Row>> {
        let mut params = vec![("select".to_string(), query.columns.clone())];
        for filter in &query.filters {
            params.push((filter.column.clone(), format!("eq.{}", filter.value)));
        }

        let response = self
            .client
            .get(self.table_url(&query.table)?)
            .query(&params)
            .send()
            .await
            .inspect_err(|_| metrics::record_store_error(&query.table, "select"))?;

        tracing::debug!(table = %query.table, status = %response.status(), "select");
        Self::read_rows(response)
            .await
            .inspect_err(|_| metrics::record_store_error(&query.table, "select"))
    }

    async fn insert(&self, query: &InsertQuery) -> StoreResult<Vec<Row>> {
        let mut request = self.client.post(self.table_url(&query.table)?).json(&query.rows);
        request = match &query.returning {
            Returning::Minimal => request.header(PREFER, "return=minimal"),
            Returning::Representation(columns) => request
                .header(PREFER, "return=representation")
                .query(&[("select", columns.as_str())]),
        };

        let response = request
            .send()
            .await
            .inspect_err(|_| metrics::record_store_error(&query.table, "insert"))?;

        tracing::debug!(table = %query.table, status = %response.status(), "insert");
        let rows = Self::read_rows(response)
            .await
            .inspect_err(|_| metrics::record_store_error(&query.table, "insert"))?;

        match query.returning {
            Returning::Minimal => Ok(Vec::new()),
            Returning::Representation(_) => Ok(rows),
        }
    }
}
