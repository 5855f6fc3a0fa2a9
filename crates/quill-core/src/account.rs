use serde::{Deserialize, Serialize};

use crate::constants::ONE_HUNDRED_PERCENT;
use crate::types::{AccountName, Asset, Percent, Symbol, Timestamp};

/// Account fields owned by the reward engine.
///
/// Generic balance bookkeeping lives behind `StakeConverter`; these are the
/// values voting and cashout read and write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: AccountName,
    /// Liquid balance.
    pub balance: Asset,
    /// Staked power owned by the account.
    pub scorumpower: Asset,
    /// Power lent to other accounts.
    pub delegated_scorumpower: Asset,
    /// Power borrowed from other accounts.
    pub received_scorumpower: Asset,

    // ── Voting ───────────────────────────────────────────────────────────────
    /// 0..=100%, regenerates toward 100% and is spent by votes.
    pub voting_power: Percent,
    pub last_vote_time: Timestamp,

    // ── Reward statistics ────────────────────────────────────────────────────
    pub curation_rewards_scr: Asset,
    pub curation_rewards_sp: Asset,
    pub posting_rewards_scr: Asset,
    pub posting_rewards_sp: Asset,
}

impl Account {
    /// Fresh account with full voting power and no history.
    pub fn new(name: AccountName, created: Timestamp) -> Self {
        Self {
            name,
            balance: Asset::scr(0),
            scorumpower: Asset::sp(0),
            delegated_scorumpower: Asset::sp(0),
            received_scorumpower: Asset::sp(0),
            voting_power: ONE_HUNDRED_PERCENT,
            last_vote_time: created,
            curation_rewards_scr: Asset::scr(0),
            curation_rewards_sp: Asset::sp(0),
            posting_rewards_scr: Asset::scr(0),
            posting_rewards_sp: Asset::sp(0),
        }
    }

    /// Stake that backs votes: own power minus delegated out plus received.
    pub fn effective_scorumpower(&self) -> i64 {
        self.scorumpower
            .amount
            .saturating_sub(self.delegated_scorumpower.amount)
            .saturating_add(self.received_scorumpower.amount)
            .max(0)
    }

    /// Own power that is not lent out.
    pub fn available_for_delegation(&self) -> i64 {
        self.scorumpower.amount.saturating_sub(self.delegated_scorumpower.amount).max(0)
    }

    pub fn record_curation_reward(&mut self, reward: Asset) {
        match reward.symbol {
            Symbol::Scr => self.curation_rewards_scr = self.curation_rewards_scr.saturating_add(reward),
            Symbol::Sp => self.curation_rewards_sp = self.curation_rewards_sp.saturating_add(reward),
        }
    }

    pub fn record_posting_reward(&mut self, reward: Asset) {
        match reward.symbol {
            Symbol::Scr => self.posting_rewards_scr = self.posting_rewards_scr.saturating_add(reward),
            Symbol::Sp => self.posting_rewards_sp = self.posting_rewards_sp.saturating_add(reward),
        }
    }
}

/// Power lent by `delegator` to `delegatee`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: AccountName,
    pub delegatee: AccountName,
    pub scorumpower: Asset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_power_counts_delegations() {
        let mut acc = Account::new("alice".into(), 0);
        acc.scorumpower = Asset::sp(1_000);
        acc.delegated_scorumpower = Asset::sp(300);
        acc.received_scorumpower = Asset::sp(50);
        assert_eq!(acc.effective_scorumpower(), 750);
        assert_eq!(acc.available_for_delegation(), 700);
    }

    #[test]
    fn reward_statistics_split_by_symbol() {
        let mut acc = Account::new("bob".into(), 0);
        acc.record_curation_reward(Asset::sp(7));
        acc.record_posting_reward(Asset::scr(3));
        assert_eq!(acc.curation_rewards_sp, Asset::sp(7));
        assert_eq!(acc.posting_rewards_scr, Asset::scr(3));
        assert_eq!(acc.curation_rewards_scr, Asset::scr(0));
    }
}
