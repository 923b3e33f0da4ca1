//! Room-level rejections.
//!
//! Every variant leaves room state untouched; the protocol layer turns
//! these into a `notice` frame delivered only to the requester.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// The connection is not in the roster of the room it is operating on.
    #[error("you are not a participant of this room")]
    NotParticipant,

    /// Code edit attempted while the typing lock is held by someone else.
    #[error("the editor is locked by {owner}")]
    EditLocked { owner: String },

    /// Lock acquisition attempted while another participant holds it.
    #[error("the typing lock is already held by {owner}")]
    LockHeldByOther { owner: String },

    /// Leader-only operation attempted by a non-leader.
    #[error("only the room leader can clear the chat")]
    NotLeader,
}
