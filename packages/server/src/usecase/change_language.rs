//! 言語変更ユースケース

use std::sync::Arc;

use crate::domain::{ConnectionId, Language, MessagePusher, RoomId};
use crate::infrastructure::SessionRegistry;
use crate::usecase::{dispatch, error::OperationError};

/// Switch a room's language, resetting the shared buffer to the new
/// language's starter template.
pub struct ChangeLanguageUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl ChangeLanguageUseCase {
    pub fn new(registry: Arc<SessionRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
        language: String,
    ) -> Result<(), OperationError> {
        let room_id = RoomId::new(room_id)?;
        let language = Language::parse(&language)
            .ok_or_else(|| OperationError::UnsupportedLanguage(language.clone()))?;
        let handle = self
            .registry
            .get(&room_id)
            .ok_or_else(|| OperationError::RoomNotFound(room_id.as_str().to_string()))?;

        let mut room = handle.lock().await;
        let events = room.change_language(connection_id, language)?;
        tracing::info!(
            "Room '{}' switched language to '{}'",
            room_id,
            language.as_str()
        );
        dispatch(self.pusher.as_ref(), &room_id, events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::domain::{Timestamp, UserName};
    use crate::infrastructure::WebSocketMessagePusher;

    #[tokio::test]
    async fn test_language_change_broadcasts_and_resets_code() {
        // テスト項目: 言語変更が全員に配信され、コードがテンプレートに戻る
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let use_case = ChangeLanguageUseCase::new(registry.clone(), pusher.clone());
        let id = RoomId::new("r1".to_string()).unwrap();
        let alice = ConnectionId::generate();
        let (tx, mut rx) = mpsc::channel(8);
        pusher.register(alice.clone(), tx);
        pusher.subscribe(&alice, &id);
        let (handle, _) = registry
            .resolve_or_create::<()>(&id, Timestamp::new(1_000), || Ok(()))
            .unwrap();
        {
            let mut room = handle.lock().await;
            room.join(
                alice.clone(),
                UserName::new("alice".to_string()).unwrap(),
                Timestamp::new(1_000),
            );
            room.set_code(&alice, "console.log(1)".to_string()).unwrap();
        }

        // when (操作):
        use_case
            .execute(&alice, "r1".to_string(), "python".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        let mut last = None;
        while let Ok(frame) = rx.try_recv() {
            last = Some(serde_json::from_str::<serde_json::Value>(&frame).unwrap());
        }
        let frame = last.unwrap();
        assert_eq!(frame["type"], "language-updated");
        assert_eq!(frame["language"], "python");
        assert_eq!(
            handle.lock().await.code(),
            Language::Python.default_template()
        );
    }

    #[tokio::test]
    async fn test_unknown_language_is_rejected() {
        // テスト項目: 未対応の言語名は UnsupportedLanguage で拒否される
        // given (前提条件):
        let registry = Arc::new(SessionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let use_case = ChangeLanguageUseCase::new(registry, pusher);

        // when (操作):
        let result = use_case
            .execute(
                &ConnectionId::generate(),
                "r1".to_string(),
                "cobol".to_string(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(OperationError::UnsupportedLanguage("cobol".to_string()))
        );
    }
}
