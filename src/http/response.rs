//! JSON response bodies.

use serde::{Deserialize, Serialize};

/// `{"message": "..."}`, the shape of every status-only reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"data": [...], "message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataBody<T> {
    pub data: T,
    pub message: String,
}
