use quill_math::RewardCurve;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::QuillError;
use crate::types::{BlockNum, Percent};

/// Block heights at which consensus rule changes activate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardforkSchedule {
    /// First block whose cashouts track parent rewards per comment instead
    /// of per author name.
    pub per_edge_propagation_block: BlockNum,
}

/// Which cashout propagation rules apply to a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RulesEpoch {
    /// Parent rewards pool per author name.
    Legacy,
    /// Parent rewards flow along each child → parent edge.
    PerEdge,
}

impl HardforkSchedule {
    pub fn epoch_at(&self, block_num: BlockNum) -> RulesEpoch {
        if block_num >= self.per_edge_propagation_block {
            RulesEpoch::PerEdge
        } else {
            RulesEpoch::Legacy
        }
    }
}

/// Every governance-tunable policy value of the reward engine.
///
/// Passed by reference into each operation; nothing reads ambient state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardParams {
    // ── Voting ───────────────────────────────────────────────────────────────
    pub cashout_window_secs: u32,
    pub upvote_lockout_secs: u32,
    pub reverse_auction_window_secs: u32,
    pub vote_regeneration_secs: u32,
    pub max_votes_per_day_voting_power_rate: u32,
    pub min_vote_interval_secs: u32,
    pub max_vote_changes: u16,
    pub vote_dust_threshold: i64,

    // ── Cashout ──────────────────────────────────────────────────────────────
    pub recent_claims_decay_secs: u32,
    pub curation_reward_percent: Percent,
    pub parent_comment_reward_percent: Percent,
    pub min_comment_payout_share: i64,
    pub max_comment_depth: u16,
    pub max_comment_beneficiaries: usize,
    pub author_reward_curve: RewardCurve,
    pub curation_reward_curve: RewardCurve,

    // ── Emission ─────────────────────────────────────────────────────────────
    pub block_interval_secs: u32,
    /// `D_min`: reserve, in days of emission, below which emission shrinks.
    pub guaranteed_reward_supply_days: u32,
    /// `D_max`: reserve, in days of emission, above which emission grows.
    pub reward_increase_threshold_days: u32,
    pub adjust_reward_percent: Percent,
    pub min_per_block_reward: i64,
    /// Blocks between emission adjustments.
    pub adjust_interval_blocks: u64,

    pub hardforks: HardforkSchedule,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            cashout_window_secs: CASHOUT_WINDOW_SECS,
            upvote_lockout_secs: UPVOTE_LOCKOUT_SECS,
            reverse_auction_window_secs: REVERSE_AUCTION_WINDOW_SECS,
            vote_regeneration_secs: VOTE_REGENERATION_SECS,
            max_votes_per_day_voting_power_rate: MAX_VOTES_PER_DAY_VOTING_POWER_RATE,
            min_vote_interval_secs: MIN_VOTE_INTERVAL_SECS,
            max_vote_changes: MAX_VOTE_CHANGES,
            vote_dust_threshold: VOTE_DUST_THRESHOLD,
            recent_claims_decay_secs: RECENT_CLAIMS_DECAY_SECS,
            curation_reward_percent: CURATION_REWARD_PERCENT,
            parent_comment_reward_percent: PARENT_COMMENT_REWARD_PERCENT,
            min_comment_payout_share: MIN_COMMENT_PAYOUT_SHARE,
            max_comment_depth: MAX_COMMENT_DEPTH,
            max_comment_beneficiaries: MAX_COMMENT_BENEFICIARIES,
            author_reward_curve: RewardCurve::Linear,
            curation_reward_curve: RewardCurve::Linear,
            block_interval_secs: BLOCK_INTERVAL_SECS,
            guaranteed_reward_supply_days: GUARANTEED_REWARD_SUPPLY_DAYS,
            reward_increase_threshold_days: REWARD_INCREASE_THRESHOLD_DAYS,
            adjust_reward_percent: ADJUST_REWARD_PERCENT,
            min_per_block_reward: MIN_PER_BLOCK_REWARD,
            adjust_interval_blocks: 1,
            hardforks: HardforkSchedule::default(),
        }
    }
}

impl RewardParams {
    /// Short windows for test networks.
    pub fn testnet() -> Self {
        Self {
            cashout_window_secs: 3_600,
            upvote_lockout_secs: 5 * 60,
            reverse_auction_window_secs: 30 * 60,
            vote_dust_threshold: 0,
            ..Self::default()
        }
    }

    /// Blocks produced per day at the configured interval.
    pub fn blocks_per_day(&self) -> u64 {
        (SECONDS_PER_DAY as u64) / self.block_interval_secs.max(1) as u64
    }

    pub fn validate(&self) -> Result<(), QuillError> {
        let invalid = |msg: &str| Err(QuillError::InvalidParams(msg.to_string()));

        if self.block_interval_secs == 0 {
            return invalid("block_interval_secs must be positive");
        }
        if self.vote_regeneration_secs == 0 || self.recent_claims_decay_secs == 0 {
            return invalid("regeneration and decay windows must be positive");
        }
        if self.reverse_auction_window_secs == 0 {
            return invalid("reverse_auction_window_secs must be positive");
        }
        if self.upvote_lockout_secs > self.cashout_window_secs {
            return invalid("upvote lockout longer than cashout window");
        }
        if (self.max_votes_per_day_voting_power_rate as u64 * self.vote_regeneration_secs as u64)
            < SECONDS_PER_DAY as u64
        {
            return invalid("max votes per day times regeneration window must cover a day");
        }
        for (name, pct) in [
            ("curation_reward_percent", self.curation_reward_percent),
            ("parent_comment_reward_percent", self.parent_comment_reward_percent),
            ("adjust_reward_percent", self.adjust_reward_percent),
        ] {
            if pct > ONE_HUNDRED_PERCENT {
                return Err(QuillError::InvalidParams(format!("{name} above 100%")));
            }
        }
        if self.guaranteed_reward_supply_days == 0
            || self.guaranteed_reward_supply_days > self.reward_increase_threshold_days
        {
            return invalid("guaranteed supply days must be positive and at most the increase threshold");
        }
        if self.min_per_block_reward < 1 {
            return invalid("min_per_block_reward must be at least 1");
        }
        if self.adjust_interval_blocks == 0 {
            return invalid("adjust_interval_blocks must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RewardParams::default().validate().unwrap();
        RewardParams::testnet().validate().unwrap();
        assert_eq!(RewardParams::default().blocks_per_day(), 28_800);
    }

    #[test]
    fn epoch_switches_at_activation_block() {
        let hf = HardforkSchedule { per_edge_propagation_block: 100 };
        assert_eq!(hf.epoch_at(99), RulesEpoch::Legacy);
        assert_eq!(hf.epoch_at(100), RulesEpoch::PerEdge);
    }

    #[test]
    fn rejects_inverted_day_band() {
        let params = RewardParams {
            guaranteed_reward_supply_days: 200,
            reward_increase_threshold_days: 100,
            ..RewardParams::default()
        };
        assert!(matches!(params.validate(), Err(QuillError::InvalidParams(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: RewardParams =
            serde_json::from_str(r#"{ "curation_reward_percent": 5000 }"#).unwrap();
        assert_eq!(params.curation_reward_percent, 5_000);
        assert_eq!(params.cashout_window_secs, CASHOUT_WINDOW_SECS);
    }
}
