//! タイピングロック切り替えユースケース

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId};
use crate::infrastructure::SessionRegistry;
use crate::usecase::{dispatch, error::OperationError};

/// Toggle the room's exclusive typing lock for the requesting connection.
pub struct ToggleTypingLockUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl ToggleTypingLockUseCase {
    pub fn new(registry: Arc<SessionRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    pub async fn execute(
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
        let events = room.toggle_typing_lock(connection_id)?;
        dispatch(self.pusher.as_ref(), &room_id, events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::domain::{RoomError, Timestamp, UserName};
    use crate::infrastructure::WebSocketMessagePusher;

    async fn fixture() -> (
        Arc<SessionRegistry>,
        Arc<WebSocketMessagePusher>,
        ToggleTypingLockUseCase,
        RoomId,
    ) {
        let registry = Arc::new(SessionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let use_case = ToggleTypingLockUseCase::new(registry.clone(), pusher.clone());
        let id = RoomId::new("r1".to_string()).unwrap();
        registry
            .resolve_or_create::<()>(&id, Timestamp::new(1_000), || Ok(()))
            .unwrap();
        (registry, pusher, use_case, id)
    }

    async fn join(
        registry: &SessionRegistry,
        pusher: &WebSocketMessagePusher,
        id: &RoomId,
        user: &str,
    ) -> (ConnectionId, mpsc::Receiver<String>) {
        let connection_id = ConnectionId::generate();
        let (tx, rx) = mpsc::channel(8);
        pusher.register(connection_id.clone(), tx);
        pusher.subscribe(&connection_id, id);
        let handle = registry.get(id).unwrap();
        handle.lock().await.join(
            connection_id.clone(),
            UserName::new(user.to_string()).unwrap(),
            Timestamp::new(1_000),
        );
        (connection_id, rx)
    }

    #[tokio::test]
    async fn test_lock_acquisition_is_broadcast_with_owner_name() {
        // テスト項目: ロック取得が保持者名付きで全員に配信される
        // given (前提条件):
        let (registry, pusher, use_case, id) = fixture().await;
        let (alice, mut alice_rx) = join(&registry, &pusher, &id, "alice").await;
        let (_bob, mut bob_rx) = join(&registry, &pusher, &id, "bob").await;
        while alice_rx.try_recv().is_ok() {}
        while bob_rx.try_recv().is_ok() {}

        // when (操作):
        use_case.execute(&alice, "r1".to_string()).await.unwrap();

        // then (期待する結果): 送信者含む全員に lock-changed が届く
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frame: serde_json::Value =
                serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
            assert_eq!(frame["type"], "lock-changed");
            assert_eq!(frame["held"], true);
            assert_eq!(frame["owner"], "alice");
        }
    }

    #[tokio::test]
    async fn test_toggle_by_other_holder_is_rejected() {
        // テスト項目: 他人保持中のロック操作は拒否され、何も配信されない
        // given (前提条件):
        let (registry, pusher, use_case, id) = fixture().await;
        let (alice, mut alice_rx) = join(&registry, &pusher, &id, "alice").await;
        let (bob, mut bob_rx) = join(&registry, &pusher, &id, "bob").await;
        use_case.execute(&alice, "r1".to_string()).await.unwrap();
        while alice_rx.try_recv().is_ok() {}
        while bob_rx.try_recv().is_ok() {}

        // when (操作):
        let result = use_case.execute(&bob, "r1".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(OperationError::Room(RoomError::LockHeldByOther {
                owner: "alice".to_string()
            }))
        );
        assert!(alice_rx.try_recv().is_err());
        assert!(bob_rx.try_recv().is_err());
    }
}
