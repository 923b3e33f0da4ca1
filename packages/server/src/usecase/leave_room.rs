//! Room 退出ユースケース

use std::sync::Arc;

use terakoya_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, RoomId, Timestamp};
use crate::infrastructure::SessionRegistry;
use crate::usecase::{dispatch, error::OperationError};

/// Leave a room, explicitly or on disconnect.
///
/// Idempotent: leaving an unknown room or leaving twice is a no-op. The
/// leaver is unsubscribed before the remaining events are dispatched, so it
/// never observes the roster it just left.
pub struct LeaveRoomUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
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

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<(), OperationError> {
        let Some(handle) = self.registry.get(room_id) else {
            self.pusher.unsubscribe(connection_id, room_id);
            return Ok(());
        };

        let mut room = handle.lock().await;
        self.pusher.unsubscribe(connection_id, room_id);
        let events = room.leave(connection_id, Timestamp::new(self.clock.now_utc_millis()));
        if !events.is_empty() {
            tracing::info!("Connection '{}' left room '{}'", connection_id, room_id);
        }
        dispatch(self.pusher.as_ref(), room_id, events);
        Ok(())
    }
}
