//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::{
        conversion::{room_detail, room_summary},
        http::{RoomDetailDto, RoomSummaryDto},
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of live rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let mut summaries = Vec::new();
    for (_, handle) in state.registry.snapshot() {
        let room = handle.lock().await;
        if !room.is_evicted() {
            summaries.push(room_summary(&room));
        }
    }
    summaries.sort_by(|a, b| a.id.cmp(&b.id));
    Json(summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let Some(handle) = state.registry.get(&room_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    let room = handle.lock().await;
    if room.is_evicted() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(room_detail(&room)))
}
