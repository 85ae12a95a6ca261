//! API error taxonomy.
//!
//! Every failure a handler can produce maps to a status code and a JSON body
//! of the form `{"message": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::http::response::MessageBody;

pub const BAD_INPUT_WISH: &str = "bad input user";
pub const BAD_INPUT_GUEST: &str = "name is required";
pub const DUPLICATE_WISH: &str = "oops you already send wish";
pub const GUEST_NOT_FOUND: &str = "guest not found";
pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later.";
pub const INTERNAL_ERROR: &str = "internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// 400, client-correctable input.
    #[error("{0}")]
    BadInput(&'static str),

    /// 400, a wish was already sent under this name.
    #[error("{}", DUPLICATE_WISH)]
    Conflict,

    /// 404, unknown guest slug.
    #[error("{}", GUEST_NOT_FOUND)]
    NotFound,

    /// 500, upstream database failure.
    #[error("{0}")]
    Database(String),

    /// 500, anything unexpected.
    #[error("{0}")]
    Internal(String),

    /// 429, client exceeded its window.
    #[error("{}", TOO_MANY_REQUESTS)]
    RateLimited,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadInput(_) | ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(MessageBody::new(self.to_string()))).into_response()
    }
}
