//! InMemory QuotaLedger 実装
//!
//! ドメイン層が定義する QuotaLedger trait の具体的な実装。
//! (identity, UTC 日付) をキーにした HashMap をインメモリのカウンタとして
//! 使用します。日付でキーイングするため、UTC 深夜 0 時のリセット処理は
//! 不要です。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;

use terakoya_shared::time::{Clock, next_utc_midnight, utc_day};

use crate::domain::{PlanTier, QuotaError, QuotaLedger};

/// In-memory per-identity, per-UTC-day room creation counters.
///
/// A single mutex over the count map makes concurrent `try_consume` calls
/// for the same identity check-and-increment atomically, so the cap cannot
/// be raced past.
pub struct InMemoryQuotaLedger {
    counts: Mutex<HashMap<(String, NaiveDate), u32>>,
    daily_cap: u32,
    clock: Arc<dyn Clock>,
}

impl InMemoryQuotaLedger {
    /// Daily room-creation cap for the rate-limited tier.
    pub const DEFAULT_DAILY_CAP: u32 = 3;

    pub fn new(daily_cap: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            daily_cap,
            clock,
        }
    }

    /// Today's count for an identity, for the HTTP surface and tests.
    pub fn count_today(&self, identity: &str) -> u32 {
        let today = utc_day(self.clock.now_utc_millis());
        self.counts
            .lock()
            .expect("quota lock poisoned")
            .get(&(identity.to_string(), today))
            .copied()
            .unwrap_or(0)
    }
}

impl QuotaLedger for InMemoryQuotaLedger {
    fn try_consume(&self, identity: &str, tier: PlanTier) -> Result<u32, QuotaError> {
        let now = self.clock.now_utc_millis();
        let today = utc_day(now);

        let mut counts = self.counts.lock().expect("quota lock poisoned");
        let count = counts.entry((identity.to_string(), today)).or_insert(0);

        if !tier.is_unlimited() && *count >= self.daily_cap {
            return Err(QuotaError::Exceeded {
                cap: self.daily_cap,
                resets_at_millis: next_utc_midnight(now),
            });
        }

        *count += 1;
        tracing::debug!(
            "Room creation counted for '{}' ({} today, tier {})",
            identity,
            *count,
            tier.as_str()
        );
        Ok(*count)
    }
}
