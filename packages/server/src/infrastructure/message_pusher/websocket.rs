//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信チャンネル（bounded `mpsc::Sender`）の管理
//! - Room 単位の購読セットの管理（subscribe / unsubscribe）
//! - イベントのエンコードと送信（push_to, publish）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `Sender` を受け取り、メッセージ送信に使用します。
//!
//! Delivery is `try_send` into a bounded queue and never blocks: a caller
//! may publish while holding a room's lock. When a connection's queue is
//! full or closed it is dropped from the pusher entirely; closing its
//! channel winds the socket task down, which performs the implicit leave
//! through the normal disconnect path.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel, RoomId,
};
use crate::infrastructure::dto::conversion::encode_event;

/// Outbound queue capacity per connection.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

#[derive(Default)]
struct PusherState {
    /// 接続中のクライアントの送信チャンネル（Key: connection id）
    connections: HashMap<String, PusherChannel>,
    /// Room ごとの購読している接続のセット
    subscriptions: HashMap<RoomId, HashSet<String>>,
}

impl PusherState {
    fn drop_connection(&mut self, connection_id: &str) {
        self.connections.remove(connection_id);
        for subscribers in self.subscriptions.values_mut() {
            subscribers.remove(connection_id);
        }
        self.subscriptions
            .retain(|_, subscribers| !subscribers.is_empty());
    }
}

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    state: Mutex<PusherState>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an encoded payload to one connection; on a full or closed
    /// queue the connection is dropped from the fanout so it cannot stall
    /// the room.
    fn deliver(state: &mut PusherState, connection_id: &str, payload: String) -> bool {
        let Some(sender) = state.connections.get(connection_id) else {
            return false;
        };
        match sender.try_send(payload) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "Outbound queue full for connection '{}'; dropping it from the fanout",
                    connection_id
                );
                state.drop_connection(connection_id);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(
                    "Outbound channel closed for connection '{}'; dropping it from the fanout",
                    connection_id
                );
                state.drop_connection(connection_id);
                false
            }
        }
    }
}

impl MessagePusher for WebSocketMessagePusher {
    fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut state = self.state.lock().expect("pusher lock poisoned");
        state
            .connections
            .insert(connection_id.as_str().to_string(), sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    fn unregister(&self, connection_id: &ConnectionId) {
        let mut state = self.state.lock().expect("pusher lock poisoned");
        state.drop_connection(connection_id.as_str());
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    fn subscribe(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let mut state = self.state.lock().expect("pusher lock poisoned");
        state
            .subscriptions
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id.as_str().to_string());
    }

    fn unsubscribe(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let mut state = self.state.lock().expect("pusher lock poisoned");
        if let Some(subscribers) = state.subscriptions.get_mut(room_id) {
            subscribers.remove(connection_id.as_str());
            if subscribers.is_empty() {
                state.subscriptions.remove(room_id);
            }
        }
    }

    fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let payload = encode_event(event);
        let mut state = self.state.lock().expect("pusher lock poisoned");

        if !state.connections.contains_key(connection_id.as_str()) {
            return Err(MessagePushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ));
        }
        if Self::deliver(&mut state, connection_id.as_str(), payload) {
            Ok(())
        } else {
            Err(MessagePushError::PushFailed(format!(
                "connection '{}' could not accept the message",
                connection_id
            )))
        }
    }

    fn publish(&self, room_id: &RoomId, event: &OutboundEvent, exclude: Option<&ConnectionId>) {
        let payload = encode_event(event);
        let mut state = self.state.lock().expect("pusher lock poisoned");

        let targets: Vec<String> = state
            .subscriptions
            .get(room_id)
            .map(|subscribers| {
                subscribers
                    .iter()
                    .filter(|id| exclude.is_none_or(|ex| ex.as_str() != id.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // ブロードキャストでは一部の送信失敗を許容
        for target in targets {
            Self::deliver(&mut state, &target, payload.clone());
        }
    }
}
