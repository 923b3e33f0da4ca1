//! チャットユースケース（送信・クリア）

use std::sync::Arc;

use terakoya_shared::time::Clock;

use crate::domain::{ConnectionId, MessageContent, MessagePusher, RoomId, Timestamp};
use crate::infrastructure::SessionRegistry;
use crate::usecase::{dispatch, error::OperationError};

/// Room chat: append a message or clear the log.
pub struct ChatUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ChatUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            clock,
        }
    }

    /// Append a message with a server-assigned timestamp and broadcast it
    /// to everyone in the room, sender included.
    pub async fn send_message(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
        message: String,
    ) -> Result<(), OperationError> {
        let room_id = RoomId::new(room_id)?;
        let content = MessageContent::new(message)?;
        let handle = self
            .registry
            .get(&room_id)
            .ok_or_else(|| OperationError::RoomNotFound(room_id.as_str().to_string()))?;

        let mut room = handle.lock().await;
        let events = room.append_chat(
            connection_id,
            content,
            Timestamp::new(self.clock.now_utc_millis()),
        )?;
        dispatch(self.pusher.as_ref(), &room_id, events);
        Ok(())
    }

    /// Empty the room's chat log; only the leader may do this.
    pub async fn clear(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
    ) -> Result<(), OperationError> {
        let room_id = RoomId::new(room_id)?;
        let handle = self
            .registry
            .get(&room_id)
            .ok_or_else(|| OperationError::RoomNotFound(room_id.as_str().to_string()))?;

        let mut room = handle.lock().await;
        let events = room.clear_chat(connection_id)?;
        tracing::info!("Chat log of room '{}' cleared", room_id);
        dispatch(self.pusher.as_ref(), &room_id, events);
        Ok(())
    }
}
