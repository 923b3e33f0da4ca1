//! Infrastructure layer: concrete implementations of the domain's
//! collaborator traits, the session registry, and wire DTOs.

pub mod dto;
pub mod execution;
pub mod message_pusher;
pub mod plan;
pub mod quota;
pub mod registry;

pub use execution::PistonExecutionClient;
pub use message_pusher::WebSocketMessagePusher;
pub use plan::StaticPlanSource;
pub use quota::InMemoryQuotaLedger;
pub use registry::SessionRegistry;
