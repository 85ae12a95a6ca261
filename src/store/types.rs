//! Row type and error definitions shared by the store backends.

use thiserror::Error;

/// A single table row as returned by the database.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Errors that can occur while talking to the database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database answered with an error payload.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded into rows.
    #[error("Decode error: {0}")]
    Decode(String),

    /// `single()` was requested but the row count was not exactly one.
    #[error("JSON object requested, multiple (or no) rows returned ({0} rows)")]
    NotSingle(usize),

    /// Backend misconfiguration (bad URL, bad key).
    #[error("Invalid store configuration: {0}")]
    Config(String),

    /// The backend is switched off (memory store failure mode).
    #[error("{0}")]
    Unavailable(String),
}

impl StoreError {
    /// The upstream message, if the error carries one worth showing a client.
    pub fn message(&self) -> Option<&str> {
        match self {
            StoreError::Api { message, .. } | StoreError::Unavailable(message) => {
                if message.is_empty() {
                    None
                } else {
                    Some(message)
                }
            }
            _ => None,
        }
    }

    /// Upstream message, or `fallback` when there is none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
