//! Outbound events computed by room operations.
//!
//! A room operation mutates state and returns a list of `Outgoing` values;
//! the use case layer hands them to the `MessagePusher` in order, while
//! still holding the room's lock, so every subscriber observes broadcasts
//! in acceptance order.

use super::language::Language;
use super::value_object::{ConnectionId, Timestamp, UserName};

/// Who a single outbound event is delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every connection subscribed to the room, sender included.
    Everyone,
    /// Every subscriber except the given connection (usually the sender).
    AllBut(ConnectionId),
    /// Exactly one connection (snapshots, rejections).
    Only(ConnectionId),
}

/// Result of a code execution, as broadcast to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Output(String),
    Error(String),
}

/// Severity attached to a requester-only `notice` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
        }
    }
}

/// Coordinator-to-participant event, protocol-agnostic.
///
/// The infrastructure layer owns the wire encoding; the domain only states
/// what happened.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// Full roster in join order; the leader is implicitly the first entry.
    RosterChanged { users: Vec<UserName> },
    CodeUpdated { code: String },
    UserTyping { user_name: UserName },
    LanguageUpdated { language: Language },
    LockChanged { held: bool, owner: Option<UserName> },
    ChatMessage {
        user_name: UserName,
        message: String,
        sent_at: Timestamp,
    },
    ChatCleared,
    RunResult { outcome: RunOutcome },
    Notice { severity: Severity, message: String },
}

/// One event paired with its delivery audience.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub audience: Audience,
    pub event: OutboundEvent,
}

impl Outgoing {
    pub fn everyone(event: OutboundEvent) -> Self {
        Self {
            audience: Audience::Everyone,
            event,
        }
    }

    pub fn all_but(connection_id: ConnectionId, event: OutboundEvent) -> Self {
        Self {
            audience: Audience::AllBut(connection_id),
            event,
        }
    }

    pub fn only(connection_id: ConnectionId, event: OutboundEvent) -> Self {
        Self {
            audience: Audience::Only(connection_id),
            event,
        }
    }
}
