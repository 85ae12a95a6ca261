//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use wedding_wishes::config::{AppConfig, StoreBackend};
use wedding_wishes::lifecycle::Shutdown;
use wedding_wishes::security::rate_limit::RateLimiter;
use wedding_wishes::store::{Database, MemoryStore};
use wedding_wishes::HttpServer;

/// A running API instance backed by an in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: MemoryStore,
    pub shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.backend = StoreBackend::Memory;
    config.app.name = "wedding".into();
    config
}

/// Serve `config` on an ephemeral port.
pub async fn spawn_app(config: AppConfig) -> TestApp {
    let store = MemoryStore::new();
    let db = Database::new(Arc::new(store.clone()));
    let (addr, shutdown) = serve(config, db).await;
    TestApp {
        addr,
        store,
        shutdown,
    }
}

/// Serve `config` with a caller-owned rate limiter on `POST /wish`.
pub async fn spawn_app_with_limiter(config: AppConfig, limiter: Arc<RateLimiter>) -> TestApp {
    let store = MemoryStore::new();
    let db = Database::new(Arc::new(store.clone()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::with_limiter(config, db, Some(limiter)).unwrap();
    tokio::spawn(server.run(listener, shutdown.subscribe()));
    TestApp {
        addr,
        store,
        shutdown,
    }
}

/// Serve `config` against an arbitrary database handle.
pub async fn serve(config: AppConfig, db: Database) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, db).unwrap();
    tokio::spawn(server.run(listener, shutdown.subscribe()));
    (addr, shutdown)
}

/// One request as seen by the mock database.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub table: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Programmable stand-in for the hosted REST database.
#[derive(Clone, Default)]
pub struct MockDatabase {
    requests: Arc<Mutex<Vec<Recorded>>>,
    replies: Arc<Mutex<HashMap<(Method, String), (u16, String)>>>,
}

impl MockDatabase {
    /// Reply to `method` on `table` with `status` and `body`.
    pub fn reply(&self, method: Method, table: &str, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert((method, table.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Start serving on an ephemeral port and return its base URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/rest/v1/{table}", any(handle_table))
            .with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }
}

async fn handle_table(
    State(mock): State<MockDatabase>,
    Path(table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    mock.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        table: table.clone(),
        query,
        headers,
        body,
    });

    let reply = mock.replies.lock().unwrap().get(&(method, table)).cloned();
    let (status, body) = reply.unwrap_or((200, "[]".to_string()));
    (
        StatusCode::from_u16(status).unwrap(),
        [("content-type", "application/json")],
        body,
    )
}
