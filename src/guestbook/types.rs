//! Guestbook request, row and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ApiError, BAD_INPUT_GUEST, BAD_INPUT_WISH};
use crate::store::StoreError;

/// Shortest accepted wish name, in characters.
pub const MIN_NAME_LEN: usize = 3;

/// Body of `POST /wish`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishInput {
    pub name: Option<String>,
    pub message: Option<String>,
}

impl WishInput {
    /// Check required fields and normalize the name.
    pub fn validate(self) -> Result<NewWish, GuestbookError> {
        let name = self.name.filter(|n| n.chars().count() >= MIN_NAME_LEN);
        let message = self.message.filter(|m| !m.is_empty());
        match (name, message) {
            (Some(name), Some(message)) => Ok(NewWish {
                name: name.to_lowercase(),
                message,
            }),
            _ => Err(GuestbookError::InvalidWish),
        }
    }
}

/// A wish ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWish {
    pub name: String,
    pub message: String,
}

/// Body of `POST /admin/guest`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestInput {
    pub name: Option<String>,
}

impl GuestInput {
    pub fn validate(self) -> Result<String, GuestbookError> {
        self.name
            .filter(|n| !n.is_empty())
            .ok_or(GuestbookError::MissingGuestName)
    }
}

/// A guest row as inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub slug: String,
}

/// Response to guest creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInvite {
    pub name: String,
    pub slug: String,
    pub url: String,
}

/// Public view of a guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestName {
    pub name: String,
}

#[derive(Debug, Error)]
pub enum GuestbookError {
    #[error("wish name or message missing")]
    InvalidWish,

    #[error("guest name missing")]
    MissingGuestName,

    #[error("a wish already exists for this name")]
    DuplicateWish,

    #[error("guest not found")]
    GuestNotFound,

    #[error("wish lookup failed: {0}")]
    LookupFailed(#[source] StoreError),

    #[error("wish insert failed: {0}")]
    InsertFailed(#[source] StoreError),

    #[error("wish listing failed: {0}")]
    ListFailed(#[source] StoreError),

    #[error("guest insert failed: {0}")]
    GuestInsertFailed(#[source] StoreError),
}

impl From<GuestbookError> for ApiError {
    fn from(err: GuestbookError) -> Self {
        match err {
            GuestbookError::InvalidWish => ApiError::BadInput(BAD_INPUT_WISH),
            GuestbookError::MissingGuestName => ApiError::BadInput(BAD_INPUT_GUEST),
            GuestbookError::DuplicateWish => ApiError::Conflict,
            GuestbookError::GuestNotFound => ApiError::NotFound,
            GuestbookError::LookupFailed(e) => ApiError::Database(e.message_or("failed get data")),
            GuestbookError::InsertFailed(e) => ApiError::Database(e.message_or("failed insert data")),
            GuestbookError::ListFailed(e) => {
                tracing::error!(error = %e, "failed to list wishes");
                ApiError::Database("failed get data".to_string())
            }
            GuestbookError::GuestInsertFailed(e) => {
                tracing::error!(error = %e, "failed to insert guest");
                ApiError::Database("failed generate guest".to_string())
            }
        }
    }
}
