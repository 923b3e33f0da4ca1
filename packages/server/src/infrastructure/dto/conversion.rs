//! Conversion logic between DTOs and domain types.

use terakoya_shared::time::timestamp_to_utc_rfc3339;

use crate::domain::{OutboundEvent, Room, RunOutcome};
use crate::infrastructure::dto::http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto};
use crate::infrastructure::dto::websocket::ServerEvent;

// ========================================
// Domain Event → DTO
// ========================================

impl From<&OutboundEvent> for ServerEvent {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::RosterChanged { users } => ServerEvent::RosterChanged {
                users: users.iter().map(|u| u.as_str().to_string()).collect(),
            },
            OutboundEvent::CodeUpdated { code } => ServerEvent::CodeUpdated { code: code.clone() },
            OutboundEvent::UserTyping { user_name } => ServerEvent::UserTyping {
                user_name: user_name.as_str().to_string(),
            },
            OutboundEvent::LanguageUpdated { language } => ServerEvent::LanguageUpdated {
                language: *language,
            },
            OutboundEvent::LockChanged { held, owner } => ServerEvent::LockChanged {
                held: *held,
                owner: owner.as_ref().map(|o| o.as_str().to_string()),
            },
            OutboundEvent::ChatMessage {
                user_name,
                message,
                sent_at,
            } => ServerEvent::ChatMessage {
                user_name: user_name.as_str().to_string(),
                message: message.clone(),
                time: timestamp_to_utc_rfc3339(sent_at.value()),
            },
            OutboundEvent::ChatCleared => ServerEvent::ChatCleared,
            OutboundEvent::RunResult { outcome } => match outcome {
                RunOutcome::Output(output) => ServerEvent::RunResult {
                    output: Some(output.clone()),
                    error: None,
                },
                RunOutcome::Error(error) => ServerEvent::RunResult {
                    output: None,
                    error: Some(error.clone()),
                },
            },
            OutboundEvent::Notice { severity, message } => ServerEvent::Notice {
                severity: severity.as_str().to_string(),
                message: message.clone(),
            },
        }
    }
}

/// Encode a domain event as one JSON wire frame.
pub fn encode_event(event: &OutboundEvent) -> String {
    let dto = ServerEvent::from(event);
    serde_json::to_string(&dto).expect("server event is always serializable")
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

pub fn room_summary(room: &Room) -> RoomSummaryDto {
    RoomSummaryDto {
        id: room.id.as_str().to_string(),
        users: room
            .participants()
            .iter()
            .map(|p| p.user_name.as_str().to_string())
            .collect(),
        language: room.language().as_str().to_string(),
        created_at: timestamp_to_utc_rfc3339(room.created_at().value()),
    }
}

pub fn room_detail(room: &Room) -> RoomDetailDto {
    RoomDetailDto {
        id: room.id.as_str().to_string(),
        language: room.language().as_str().to_string(),
        file_extension: room.language().extension().to_string(),
        participants: room
            .participants()
            .iter()
            .map(|p| ParticipantDetailDto {
                user_name: p.user_name.as_str().to_string(),
                joined_at: timestamp_to_utc_rfc3339(p.joined_at.value()),
            })
            .collect(),
        code_bytes: room.code().len(),
        chat_messages: room.chat_log().len(),
        created_at: timestamp_to_utc_rfc3339(room.created_at().value()),
    }
}
