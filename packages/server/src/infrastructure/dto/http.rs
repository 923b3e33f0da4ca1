//! HTTP API response DTOs.

use serde::Serialize;

/// Summary of one room, for `GET /api/rooms`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub users: Vec<String>,
    pub language: String,
    pub created_at: String,
}

/// Detail of one room, for `GET /api/rooms/{room_id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub language: String,
    /// File extension matching the room's language, for buffer export.
    pub file_extension: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub code_bytes: usize,
    pub chat_messages: usize,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub user_name: String,
    pub joined_at: String,
}
