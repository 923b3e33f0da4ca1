//! Domain entities: the Room state machine and its parts.
//!
//! All mutation goes through the operation methods below. Each operation
//! either rejects with a `RoomError` (state untouched) or mutates and
//! returns the outbound events the mutation produced, in the order they
//! must be delivered. The caller is responsible for serializing operations
//! on one room and for dispatching the events before releasing that
//! serialization point.

use super::error::RoomError;
use super::event::{Outgoing, OutboundEvent};
use super::language::Language;
use super::value_object::{ConnectionId, MessageContent, RoomId, Timestamp, UserName};

/// One connected participant of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub user_name: UserName,
    pub joined_at: Timestamp,
}

/// One chat message with its server-assigned timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user_name: UserName,
    pub content: MessageContent,
    pub sent_at: Timestamp,
}

/// One collaborative editing session.
///
/// The roster is insertion-ordered by join time; the leader is always the
/// roster head and is never stored separately, so it cannot desynchronize.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    code: String,
    language: Language,
    participants: Vec<Participant>,
    typing_lock: Option<ConnectionId>,
    chat_log: Vec<ChatMessage>,
    created_at: Timestamp,
    /// Set when the roster becomes empty; drives eviction after the grace
    /// period. Cleared by the next join.
    last_empty_at: Option<Timestamp>,
    /// Set by the registry sweep, under this room's lock, just before the
    /// room is dropped from the map. A join that raced the sweep observes
    /// this and re-resolves instead of mutating an orphaned room.
    evicted: bool,
}

impl Room {
    /// Newest-first truncation bound for the chat log.
    pub const MAX_CHAT_LOG: usize = 500;

    /// Create an empty room seeded with the default language and template.
    pub fn new(id: RoomId, now: Timestamp) -> Self {
        let language = Language::default();
        Self {
            id,
            code: language.default_template().to_string(),
            language,
            participants: Vec::new(),
            typing_lock: None,
            chat_log: Vec::new(),
            created_at: now,
            last_empty_at: Some(now),
            evicted: false,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat_log
    }

    pub fn typing_lock(&self) -> Option<&ConnectionId> {
        self.typing_lock.as_ref()
    }

    /// The earliest-joined surviving participant, or `None` when empty.
    pub fn leader(&self) -> Option<&Participant> {
        self.participants.first()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_evicted(&self) -> bool {
        self.evicted
    }

    pub fn mark_evicted(&mut self) {
        self.evicted = true;
    }

    /// Empty past the grace period, hence removable by the registry sweep.
    pub fn eviction_due(&self, now: Timestamp, grace_millis: i64) -> bool {
        self.participants.is_empty()
            && self
                .last_empty_at
                .is_some_and(|empty_at| now.value() - empty_at.value() >= grace_millis)
    }

    fn participant(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| &p.connection_id == connection_id)
    }

    fn participant_name(&self, connection_id: &ConnectionId) -> Option<UserName> {
        self.participant(connection_id).map(|p| p.user_name.clone())
    }

    fn roster(&self) -> Vec<UserName> {
        self.participants
            .iter()
            .map(|p| p.user_name.clone())
            .collect()
    }

    fn snapshot_for(&self, connection_id: &ConnectionId) -> Vec<Outgoing> {
        vec![
            Outgoing::only(
                connection_id.clone(),
                OutboundEvent::LanguageUpdated {
                    language: self.language,
                },
            ),
            Outgoing::only(
                connection_id.clone(),
                OutboundEvent::CodeUpdated {
                    code: self.code.clone(),
                },
            ),
        ]
    }

    /// Append a participant at the roster tail.
    ///
    /// The joining connection receives the current language and code as a
    /// snapshot, then everyone (joiner included) receives the new roster.
    /// A join for a connection already in the roster only re-sends the
    /// snapshot; the roster is left untouched.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        user_name: UserName,
        now: Timestamp,
    ) -> Vec<Outgoing> {
        if self.participant(&connection_id).is_some() {
            let mut events = self.snapshot_for(&connection_id);
            events.push(Outgoing::only(
                connection_id,
                OutboundEvent::RosterChanged {
                    users: self.roster(),
                },
            ));
            return events;
        }

        self.participants.push(Participant {
            connection_id: connection_id.clone(),
            user_name,
            joined_at: now,
        });
        self.last_empty_at = None;

        let mut events = self.snapshot_for(&connection_id);
        events.push(Outgoing::everyone(OutboundEvent::RosterChanged {
            users: self.roster(),
        }));
        events
    }

    /// Remove a participant; no-op if the connection is not in the roster.
    ///
    /// Releasing the typing lock is broadcast strictly before the roster
    /// update, so no subsequent code change can be observed ahead of the
    /// release.
    pub fn leave(&mut self, connection_id: &ConnectionId, now: Timestamp) -> Vec<Outgoing> {
        let Some(index) = self
            .participants
            .iter()
            .position(|p| &p.connection_id == connection_id)
        else {
            return Vec::new();
        };

        self.participants.remove(index);

        let mut events = Vec::new();
        if self.typing_lock.as_ref() == Some(connection_id) {
            self.typing_lock = None;
            events.push(Outgoing::everyone(OutboundEvent::LockChanged {
                held: false,
                owner: None,
            }));
        }
        events.push(Outgoing::everyone(OutboundEvent::RosterChanged {
            users: self.roster(),
        }));

        if self.participants.is_empty() {
            self.last_empty_at = Some(now);
        }
        events
    }

    /// Replace the buffer, last-writer-wins, and notify everyone but the
    /// sender. Rejected while the typing lock is held by another
    /// participant.
    pub fn set_code(
        &mut self,
        connection_id: &ConnectionId,
        code: String,
    ) -> Result<Vec<Outgoing>, RoomError> {
        if self.participant(connection_id).is_none() {
            return Err(RoomError::NotParticipant);
        }
        if let Some(owner) = &self.typing_lock
            && owner != connection_id
        {
            let owner_name = self
                .participant_name(owner)
                .map(|n| n.into_string())
                .unwrap_or_default();
            return Err(RoomError::EditLocked { owner: owner_name });
        }

        self.code = code.clone();
        Ok(vec![Outgoing::all_but(
            connection_id.clone(),
            OutboundEvent::CodeUpdated { code },
        )])
    }

    /// Switch the language and reset the buffer to its template.
    pub fn change_language(
        &mut self,
        connection_id: &ConnectionId,
        language: Language,
    ) -> Result<Vec<Outgoing>, RoomError> {
        if self.participant(connection_id).is_none() {
            return Err(RoomError::NotParticipant);
        }

        self.language = language;
        self.code = language.default_template().to_string();
        Ok(vec![Outgoing::everyone(OutboundEvent::LanguageUpdated {
            language,
        })])
    }

    /// Acquire the lock when free, release it when held by the requester,
    /// reject when held by anyone else.
    pub fn toggle_typing_lock(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<Outgoing>, RoomError> {
        let Some(requester_name) = self.participant_name(connection_id) else {
            return Err(RoomError::NotParticipant);
        };

        match &self.typing_lock {
            None => {
                self.typing_lock = Some(connection_id.clone());
                Ok(vec![Outgoing::everyone(OutboundEvent::LockChanged {
                    held: true,
                    owner: Some(requester_name),
                })])
            }
            Some(owner) if owner == connection_id => {
                self.typing_lock = None;
                Ok(vec![Outgoing::everyone(OutboundEvent::LockChanged {
                    held: false,
                    owner: None,
                })])
            }
            Some(owner) => {
                let owner_name = self
                    .participant_name(owner)
                    .map(|n| n.into_string())
                    .unwrap_or_default();
                Err(RoomError::LockHeldByOther { owner: owner_name })
            }
        }
    }

    /// Ephemeral typing indicator; no state is retained.
    pub fn typing_ping(&self, connection_id: &ConnectionId) -> Result<Vec<Outgoing>, RoomError> {
        let Some(user_name) = self.participant_name(connection_id) else {
            return Err(RoomError::NotParticipant);
        };
        Ok(vec![Outgoing::all_but(
            connection_id.clone(),
            OutboundEvent::UserTyping { user_name },
        )])
    }

    /// Append a chat message and broadcast it to everyone, sender included,
    /// so every participant observes the same message order.
    pub fn append_chat(
        &mut self,
        connection_id: &ConnectionId,
        content: MessageContent,
        now: Timestamp,
    ) -> Result<Vec<Outgoing>, RoomError> {
        let Some(user_name) = self.participant_name(connection_id) else {
            return Err(RoomError::NotParticipant);
        };

        self.chat_log.push(ChatMessage {
            user_name: user_name.clone(),
            content: content.clone(),
            sent_at: now,
        });
        if self.chat_log.len() > Self::MAX_CHAT_LOG {
            let excess = self.chat_log.len() - Self::MAX_CHAT_LOG;
            self.chat_log.drain(..excess);
        }

        Ok(vec![Outgoing::everyone(OutboundEvent::ChatMessage {
            user_name,
            message: content.into_string(),
            sent_at: now,
        })])
    }

    /// Empty the chat log; leader only.
    pub fn clear_chat(&mut self, connection_id: &ConnectionId) -> Result<Vec<Outgoing>, RoomError> {
        if self.participant(connection_id).is_none() {
            return Err(RoomError::NotParticipant);
        }
        let is_leader = self
            .leader()
            .is_some_and(|leader| &leader.connection_id == connection_id);
        if !is_leader {
            return Err(RoomError::NotLeader);
        }

        self.chat_log.clear();
        Ok(vec![Outgoing::everyone(OutboundEvent::ChatCleared)])
    }
}
