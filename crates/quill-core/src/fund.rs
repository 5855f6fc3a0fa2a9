use serde::{Deserialize, Serialize};

use crate::types::{Asset, Claim, Symbol, Timestamp};

/// Undistributed content emission of one denomination.
///
/// One singleton per symbol; handed explicitly to whoever mutates it. The
/// curves it pays by come from `RewardParams`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardFund {
    pub balance: Asset,
    /// Decaying sum of recently paid claims; the denominator of every payout.
    pub recent_claims: Claim,
    pub last_update: Timestamp,
}

impl RewardFund {
    pub fn new(symbol: Symbol, now: Timestamp) -> Self {
        Self { balance: Asset::zero(symbol), recent_claims: 0, last_update: now }
    }

    pub fn symbol(&self) -> Symbol {
        self.balance.symbol
    }
}
