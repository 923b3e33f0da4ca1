//! コード編集ユースケース（コード変更・タイピング通知）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId};
use crate::infrastructure::registry::RoomHandle;
use crate::infrastructure::SessionRegistry;
use crate::usecase::{dispatch, error::OperationError};

/// Apply a buffer replacement or a typing ping to a room.
pub struct EditCodeUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl EditCodeUseCase {
    pub fn new(registry: Arc<SessionRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    fn resolve(&self, room_id: String) -> Result<(RoomId, RoomHandle), OperationError> {
        let room_id = RoomId::new(room_id)?;
        let handle = self
            .registry
            .get(&room_id)
            .ok_or_else(|| OperationError::RoomNotFound(room_id.as_str().to_string()))?;
        Ok((room_id, handle))
    }

    /// Replace the room's buffer with the sender's full text.
    pub async fn code_change(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
        code: String,
    ) -> Result<(), OperationError> {
        let (room_id, handle) = self.resolve(room_id)?;
        let mut room = handle.lock().await;
        let events = room.set_code(connection_id, code)?;
        dispatch(self.pusher.as_ref(), &room_id, events);
        Ok(())
    }

    /// Relay an ephemeral typing indicator to the other participants.
    pub async fn typing_ping(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
    ) -> Result<(), OperationError> {
        let (room_id, handle) = self.resolve(room_id)?;
        let room = handle.lock().await;
        let events = room.typing_ping(connection_id)?;
        dispatch(self.pusher.as_ref(), &room_id, events);
        Ok(())
    }
}
