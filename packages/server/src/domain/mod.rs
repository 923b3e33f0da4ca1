//! Domain layer: entities, value objects, events, and the collaborator
//! traits implemented by the infrastructure layer (dependency inversion).

pub mod entity;
pub mod error;
pub mod event;
pub mod execution;
pub mod language;
pub mod pusher;
pub mod quota;
pub mod value_object;

pub use entity::{ChatMessage, Participant, Room};
pub use error::RoomError;
pub use event::{Audience, Outgoing, OutboundEvent, RunOutcome, Severity};
pub use execution::{ExecutionClient, ExecutionError, ExecutionRequest, RunOutput};
pub use language::Language;
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use quota::{PlanSource, PlanTier, QuotaError, QuotaLedger};
pub use value_object::{ConnectionId, MessageContent, RoomId, Timestamp, UserName, ValidationError};
