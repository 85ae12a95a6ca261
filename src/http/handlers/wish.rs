//! Wish endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::ApiError;
use crate::guestbook::WishInput;
use crate::http::response::{DataBody, MessageBody};
use crate::http::server::AppState;
use crate::store::Row;

/// `POST /wish`
///
/// An unreadable body is treated like an empty one and fails validation.
pub async fn submit_wish(
    State(state): State<AppState>,
    payload: Result<Json<WishInput>, JsonRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable wish body");
            WishInput::default()
        }
    };

    state.guestbook.submit_wish(input).await?;
    Ok(Json(MessageBody::new("success insert")))
}

/// `GET /wish`
pub async fn list_wishes(
    State(state): State<AppState>,
) -> Result<Json<DataBody<Vec<Row>>>, ApiError> {
    let data = state.guestbook.list_wishes().await?;
    Ok(Json(DataBody {
        data,
        message: "success get data".to_string(),
    }))
}
