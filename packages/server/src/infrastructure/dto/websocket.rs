//! WebSocket event DTOs.
//!
//! One JSON object per frame, tagged by `type`. Inbound tags are camelCase
//! verbs, outbound tags are kebab-case facts; fields are camelCase on both
//! sides.

use serde::{Deserialize, Serialize};

use crate::domain::Language;

/// Participant → coordinator events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    Join {
        room_id: String,
        user_name: String,
    },
    Leave,
    CodeChange {
        room_id: String,
        code: String,
    },
    /// `user_name` is informational; the roster entry of the sending
    /// connection is authoritative.
    TypingPing {
        room_id: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    LanguageChange {
        room_id: String,
        language: String,
    },
    ToggleTypingLock {
        room_id: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    Run {
        room_id: String,
        code: String,
        language: String,
        #[serde(default = "default_version_hint")]
        version_hint: String,
        #[serde(default)]
        stdin: String,
    },
    ChatMessage {
        room_id: String,
        message: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    ClearChat {
        room_id: String,
    },
}

fn default_version_hint() -> String {
    "*".to_string()
}

/// Coordinator → participant events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Roster in join order; the leader is implicitly the first element.
    RosterChanged {
        users: Vec<String>,
    },
    CodeUpdated {
        code: String,
    },
    UserTyping {
        user_name: String,
    },
    LanguageUpdated {
        language: Language,
    },
    RunResult {
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    LockChanged {
        held: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
    },
    ChatMessage {
        user_name: String,
        message: String,
        /// Server-assigned send time, RFC 3339 in UTC.
        time: String,
    },
    ChatCleared,
    Notice {
        severity: String,
        message: String,
    },
}
