//! コード実行ユースケース

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ExecutionClient, ExecutionRequest, Language, MessagePusher, OutboundEvent,
    RoomError, RoomId, RunOutcome,
};
use crate::infrastructure::SessionRegistry;
use crate::usecase::error::OperationError;

/// Forward submitted code to the execution service and broadcast the
/// outcome to the whole room.
///
/// The remote call runs in a spawned task so no room lock is held across
/// it; the result re-enters through the registry and is published under the
/// room's lock like any other broadcast. Concurrent runs are not
/// serialized against each other: each completion is broadcast as it
/// arrives and the last one wins the shared output panel.
pub struct RunCodeUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn MessagePusher>,
    execution: Arc<dyn ExecutionClient>,
}

impl RunCodeUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        pusher: Arc<dyn MessagePusher>,
        execution: Arc<dyn ExecutionClient>,
    ) -> Self {
        Self {
            registry,
            pusher,
            execution,
        }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
        code: String,
        language: String,
        version_hint: String,
        stdin: String,
    ) -> Result<(), OperationError> {
        let room_id = RoomId::new(room_id)?;
        let language = Language::parse(&language)
            .ok_or_else(|| OperationError::UnsupportedLanguage(language.clone()))?;
        let handle = self
            .registry
            .get(&room_id)
            .ok_or_else(|| OperationError::RoomNotFound(room_id.as_str().to_string()))?;

        {
            let room = handle.lock().await;
            if !room
                .participants()
                .iter()
                .any(|p| &p.connection_id == connection_id)
            {
                return Err(OperationError::Room(RoomError::NotParticipant));
            }
        }

        let request = ExecutionRequest {
            code,
            language,
            version: version_hint,
            stdin,
        };
        let registry = self.registry.clone();
        let pusher = self.pusher.clone();
        let execution = self.execution.clone();
        tokio::spawn(async move {
            let outcome = match execution.execute(request).await {
                Ok(run) => RunOutcome::Output(run.output),
                Err(e) => {
                    tracing::warn!("Code execution for room '{}' failed: {}", room_id, e);
                    RunOutcome::Error(e.to_string())
                }
            };

            // Re-resolve: the room may have been evicted while the code ran.
            let Some(handle) = registry.get(&room_id) else {
                tracing::debug!("Room '{}' is gone; discarding run result", room_id);
                return;
            };
            let room = handle.lock().await;
            if !room.is_evicted() {
                pusher.publish(&room_id, &OutboundEvent::RunResult { outcome }, None);
            }
        });
        Ok(())
    }
}
