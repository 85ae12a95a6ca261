use axum::{extract::State, Json};

use crate::http::response::MessageBody;
use crate::http::server::AppState;

/// `GET /`
pub async fn health(State(state): State<AppState>) -> Json<MessageBody> {
    Json(MessageBody::new(format!("{} run normally OK", state.app_name)))
}
