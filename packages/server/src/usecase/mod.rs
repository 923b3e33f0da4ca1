//! UseCase layer: one use case per coordinator operation.
//!
//! Use cases resolve the target room through the session registry, apply
//! the operation while holding that room's lock, and hand the computed
//! events to the `MessagePusher` before releasing it, which is what makes
//! every subscriber observe broadcasts in acceptance order.

mod change_language;
mod chat;
mod edit_code;
pub mod error;
mod join_room;
mod leave_room;
mod run_code;
mod toggle_typing_lock;

pub use change_language::ChangeLanguageUseCase;
pub use chat::ChatUseCase;
pub use edit_code::EditCodeUseCase;
pub use error::OperationError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use run_code::RunCodeUseCase;
pub use toggle_typing_lock::ToggleTypingLockUseCase;

use crate::domain::{Audience, MessagePusher, Outgoing, RoomId};

/// Deliver a room operation's events in order.
///
/// Callers invoke this while still holding the room's lock; the pusher is
/// non-blocking, so nothing suspends here.
pub(crate) fn dispatch(pusher: &dyn MessagePusher, room_id: &RoomId, outgoings: Vec<Outgoing>) {
    for outgoing in outgoings {
        match outgoing.audience {
            Audience::Everyone => pusher.publish(room_id, &outgoing.event, None),
            Audience::AllBut(ref excluded) => {
                pusher.publish(room_id, &outgoing.event, Some(excluded))
            }
            Audience::Only(ref target) => {
                if let Err(e) = pusher.push_to(target, &outgoing.event) {
                    tracing::warn!("Failed to push event to connection '{}': {}", target, e);
                }
            }
        }
    }
}
