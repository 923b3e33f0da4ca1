//! QuotaLedger / PlanSource trait 定義
//!
//! Room 作成のレート制限が必要とするインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use thiserror::Error;

/// Subscription tier of an identity.
///
/// The tier is resolved server-side through `PlanSource`; the client never
/// supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTier {
    Free,
    Pro,
    Team,
}

impl PlanTier {
    /// Whether the tier is exempt from the daily room-creation cap.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, PlanTier::Pro | PlanTier::Team)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Pro => "Pro",
            PlanTier::Team => "Team",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotaError {
    /// Daily cap reached; `resets_at_millis` is the next UTC midnight.
    #[error("daily room creation limit of {cap} reached")]
    Exceeded { cap: u32, resets_at_millis: i64 },
}

/// Per-identity, per-UTC-day counters gating room creation.
///
/// Counts are monotonically non-decreasing within a day; keying by date
/// makes the midnight reset implicit. Implementations must be safe under
/// concurrent calls for the same identity.
#[cfg_attr(test, mockall::automock)]
pub trait QuotaLedger: Send + Sync {
    /// Count one room creation for `identity` today.
    ///
    /// Unlimited tiers always succeed (the increment is bookkeeping only).
    /// The rate-limited tier succeeds while today's count is below the cap,
    /// otherwise fails with the cap and the next reset time.
    fn try_consume(&self, identity: &str, tier: PlanTier) -> Result<u32, QuotaError>;
}

/// Server-held mapping from identity to subscription tier.
#[cfg_attr(test, mockall::automock)]
pub trait PlanSource: Send + Sync {
    fn tier_of(&self, identity: &str) -> PlanTier;
}
