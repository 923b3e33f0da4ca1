//! UseCase 層のエラー定義
//!
//! 各 UseCase が返すエラーを集約し、UI 層が requester への notice に
//! 変換できる形にします。

use thiserror::Error;

use crate::domain::{QuotaError, RoomError, Severity, ValidationError};
use terakoya_shared::time::timestamp_to_utc_rfc3339;

/// Any rejection a coordinator operation can produce.
///
/// All variants reject without mutating room state; the UI layer surfaces
/// them to the requesting connection only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unsupported language '{0}'")]
    UnsupportedLanguage(String),
    #[error("room '{0}' was not found")]
    RoomNotFound(String),
    #[error(transparent)]
    Room(#[from] RoomError),
    #[error(transparent)]
    Quota(#[from] QuotaError),
}

impl OperationError {
    /// Severity of the notice shown to the requester.
    ///
    /// Contention outcomes (lock held, not the leader) are ordinary
    /// coordination, so they surface as warnings; everything else is a
    /// plain error.
    pub fn severity(&self) -> Severity {
        match self {
            OperationError::Room(RoomError::EditLocked { .. })
            | OperationError::Room(RoomError::LockHeldByOther { .. })
            | OperationError::Room(RoomError::NotLeader) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Human-readable notice body for the requester.
    pub fn notice_message(&self) -> String {
        match self {
            OperationError::Quota(QuotaError::Exceeded {
                cap,
                resets_at_millis,
            }) => format!(
                "Free plan users can create up to {} rooms per day. The limit resets at {}. Upgrade to the Pro or Team plan for unlimited rooms.",
                cap,
                timestamp_to_utc_rfc3339(*resets_at_millis)
            ),
            other => other.to_string(),
        }
    }
}
