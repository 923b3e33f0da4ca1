//! Room 参加ユースケース

use std::sync::Arc;

use terakoya_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, PlanSource, QuotaLedger, RoomId, Timestamp, UserName,
};
use crate::infrastructure::SessionRegistry;
use crate::usecase::{dispatch, error::OperationError};

/// Join a room, creating it first when the id is unknown.
///
/// Creation is gated by the joiner's daily quota; joining an existing room
/// never consumes quota. The joiner is subscribed to the room's fanout
/// before the join events are dispatched, so it receives its own snapshot
/// and the roster update.
pub struct JoinRoomUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn MessagePusher>,
    quota: Arc<dyn QuotaLedger>,
    plans: Arc<dyn PlanSource>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        pusher: Arc<dyn MessagePusher>,
        quota: Arc<dyn QuotaLedger>,
        plans: Arc<dyn PlanSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            quota,
            plans,
            clock,
        }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
        user_name: String,
    ) -> Result<RoomId, OperationError> {
        let room_id = RoomId::new(room_id)?;
        let user_name = UserName::new(user_name)?;

        loop {
            let now = Timestamp::new(self.clock.now_utc_millis());
            let (handle, created) = self.registry.resolve_or_create(&room_id, now, || {
                let tier = self.plans.tier_of(user_name.as_str());
                self.quota.try_consume(user_name.as_str(), tier).map(|_| ())
            })?;

            let mut room = handle.lock().await;
            // An eviction sweep may have dropped this room between the map
            // lookup and taking its lock; start over on a fresh one.
            if room.is_evicted() {
                continue;
            }

            self.pusher.subscribe(connection_id, &room_id);
            let events = room.join(connection_id.clone(), user_name.clone(), now);
            dispatch(self.pusher.as_ref(), &room_id, events);

            if created {
                tracing::info!(
                    "User '{}' created and joined room '{}'",
                    user_name,
                    room_id
                );
            } else {
                tracing::info!("User '{}' joined room '{}'", user_name, room_id);
            }
            return Ok(room_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terakoya_shared::time::FixedClock;
    use tokio::sync::mpsc;

    use crate::domain::quota::{MockPlanSource, MockQuotaLedger, PlanTier, QuotaError};
    use crate::infrastructure::WebSocketMessagePusher;

    fn collect_frames(rx: &mut mpsc::Receiver<String>) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    fn use_case(
        registry: Arc<SessionRegistry>,
        pusher: Arc<WebSocketMessagePusher>,
        quota: MockQuotaLedger,
        plans: MockPlanSource,
    ) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            registry,
            pusher,
            Arc::new(quota),
            Arc::new(plans),
            Arc::new(FixedClock::new(1_000)),
        )
    }

    #[tokio::test]
    async fn test_first_join_creates_room_and_sends_snapshot_then_roster() {
        // テスト項目: 初回 join で Room が作られ、スナップショット→ロスターの順に届く
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let mut quota = MockQuotaLedger::new();
        quota
            .expect_try_consume()
            .withf(|identity, tier| identity == "alice" && *tier == PlanTier::Free)
            .times(1)
            .returning(|_, _| Ok(1));
        let mut plans = MockPlanSource::new();
        plans.expect_tier_of().returning(|_| PlanTier::Free);
        let use_case = use_case(registry.clone(), pusher.clone(), quota, plans);

        let alice = ConnectionId::generate();
        let (tx, mut rx) = mpsc::channel(8);
        pusher.register(alice.clone(), tx);

        // when (操作):
        let room_id = use_case
            .execute(&alice, "r1".to_string(), "alice".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room_id.as_str(), "r1");
        assert_eq!(registry.room_count(), 1);
        let frames = collect_frames(&mut rx);
        assert_eq!(frames[0]["type"], "language-updated");
        assert_eq!(frames[1]["type"], "code-updated");
        assert_eq!(frames[2]["type"], "roster-changed");
        assert_eq!(frames[2]["users"], serde_json::json!(["alice"]));
    }

    #[tokio::test]
    async fn test_joining_existing_room_does_not_consume_quota() {
        // テスト項目: 既存 Room への join ではクォータが消費されない
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let mut quota = MockQuotaLedger::new();
        quota.expect_try_consume().times(1).returning(|_, _| Ok(1));
        let mut plans = MockPlanSource::new();
        plans.expect_tier_of().returning(|_| PlanTier::Free);
        let use_case = use_case(registry.clone(), pusher.clone(), quota, plans);

        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let (alice_tx, _alice_rx) = mpsc::channel(8);
        let (bob_tx, _bob_rx) = mpsc::channel(8);
        pusher.register(alice.clone(), alice_tx);
        pusher.register(bob.clone(), bob_tx);
        use_case
            .execute(&alice, "r1".to_string(), "alice".to_string())
            .await
            .unwrap();

        // when (操作): try_consume の times(1) を超えると mock が panic する
        let result = use_case
            .execute(&bob, "r1".to_string(), "bob".to_string())
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.room_count(), 1);
    }

    #[tokio::test]
    async fn test_quota_denial_creates_no_room() {
        // テスト項目: クォータ超過の join は拒否され、Room が作成されない
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let mut quota = MockQuotaLedger::new();
        quota.expect_try_consume().times(1).returning(|_, _| {
            Err(QuotaError::Exceeded {
                cap: 3,
                resets_at_millis: 86_400_000,
            })
        });
        let mut plans = MockPlanSource::new();
        plans.expect_tier_of().returning(|_| PlanTier::Free);
        let use_case = use_case(registry.clone(), pusher.clone(), quota, plans);

        let alice = ConnectionId::generate();
        let (tx, mut rx) = mpsc::channel(8);
        pusher.register(alice.clone(), tx);

        // when (操作):
        let result = use_case
            .execute(&alice, "r1".to_string(), "alice".to_string())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(OperationError::Quota(_))));
        assert_eq!(registry.room_count(), 0);
        assert!(collect_frames(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_join_with_blank_user_name_is_rejected() {
        // テスト項目: 空白のみのユーザー名の join はバリデーションで拒否される
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let quota = MockQuotaLedger::new();
        let plans = MockPlanSource::new();
        let use_case = use_case(registry.clone(), pusher.clone(), quota, plans);

        // when (操作):
        let result = use_case
            .execute(&ConnectionId::generate(), "r1".to_string(), "  ".to_string())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(OperationError::Validation(_))));
        assert_eq!(registry.room_count(), 0);
    }
}
