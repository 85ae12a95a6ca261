//! Guest endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::error::ApiError;
use crate::guestbook::{GuestInput, GuestInvite, GuestName};
use crate::http::server::AppState;

/// `POST /admin/guest`
pub async fn create_guest(
    State(state): State<AppState>,
    payload: Result<Json<GuestInput>, JsonRejection>,
) -> Result<Json<GuestInvite>, ApiError> {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable guest body");
            GuestInput::default()
        }
    };

    let invite = state.guestbook.create_guest(input).await?;
    Ok(Json(invite))
}

/// `GET /guest/{slug}`
pub async fn get_guest(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GuestName>, ApiError> {
    let guest = state.guestbook.find_guest(&slug).await?;
    Ok(Json(guest))
}
