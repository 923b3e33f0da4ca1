//! Static PlanSource 実装
//!
//! ドメイン層が定義する PlanSource trait の具体的な実装。
//! identity → プランの固定マップで、未登録の identity にはデフォルトの
//! プランを返します。
//!
//! The tier is looked up server-side on every quota check; nothing the
//! client sends can influence it.

use std::collections::HashMap;

use crate::domain::{PlanSource, PlanTier};

pub struct StaticPlanSource {
    tiers: HashMap<String, PlanTier>,
    default_tier: PlanTier,
}

impl StaticPlanSource {
    pub fn new(tiers: HashMap<String, PlanTier>, default_tier: PlanTier) -> Self {
        Self {
            tiers,
            default_tier,
        }
    }
}

impl Default for StaticPlanSource {
    /// Everyone on the rate-limited tier until an identity record says
    /// otherwise.
    fn default() -> Self {
        Self::new(HashMap::new(), PlanTier::Free)
    }
}

impl PlanSource for StaticPlanSource {
    fn tier_of(&self, identity: &str) -> PlanTier {
        self.tiers
            .get(identity)
            .copied()
            .unwrap_or(self.default_tier)
    }
}
