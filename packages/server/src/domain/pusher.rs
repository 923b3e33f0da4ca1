//! MessagePusher trait 定義
//!
//! Room 操作が計算したイベントを各接続へ届けるためのインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します（依存性の逆転）。
//!
//! All methods are synchronous and non-blocking: delivery goes into a
//! bounded per-connection queue via `try_send`, so a use case may call the
//! pusher while holding a room's lock without ever suspending there.

use thiserror::Error;

use super::event::OutboundEvent;
use super::value_object::{ConnectionId, RoomId};

/// Outbound channel handed to the pusher when a connection registers.
///
/// Bounded so that one slow client cannot buffer without limit; on overflow
/// the connection is dropped from the fanout rather than blocking the room.
pub type PusherChannel = tokio::sync::mpsc::Sender<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Delivers events to connections, individually or fanned out per room.
pub trait MessagePusher: Send + Sync {
    /// Bind a connection to its outbound queue.
    fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Drop a connection and all of its room subscriptions.
    fn unregister(&self, connection_id: &ConnectionId);

    /// Add a connection to a room's fanout set.
    fn subscribe(&self, connection_id: &ConnectionId, room_id: &RoomId);

    /// Remove a connection from a room's fanout set.
    fn unsubscribe(&self, connection_id: &ConnectionId, room_id: &RoomId);

    /// Deliver one event to one connection.
    fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// Deliver one event to every subscriber of `room_id`, best-effort,
    /// except the optionally excluded connection.
    fn publish(&self, room_id: &RoomId, event: &OutboundEvent, exclude: Option<&ConnectionId>);
}
