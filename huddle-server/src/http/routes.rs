use crate::signaling::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use huddle_core::RoomId;
use serde::Serialize;

#[derive(Serialize)]
struct ExistsResponse {
    exists: bool,
}

/// `GET /rooms/{room_id}` — read-only snapshot of a room, 404 if unknown.
pub async fn describe_room(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.registry.describe(&RoomId::from(room_id)) {
        Some(info) => Json(info).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// `GET /rooms/{room_id}/exists`
pub async fn room_exists(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let exists = state.registry.describe(&RoomId::from(room_id)).is_some();
    Json(ExistsResponse { exists })
}
