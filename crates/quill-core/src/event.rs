use serde::{Deserialize, Serialize};

use crate::types::{AccountName, Asset, BlockNum, CommentRef, Rshares};

/// Externally observable side effects, recorded for history/indexing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewardEvent {
    // ── Voting ───────────────────────────────────────────────────────────────
    VoteApplied {
        voter: AccountName,
        comment: CommentRef,
        weight: i16,
        rshares: Rshares,
    },

    // ── Emission ─────────────────────────────────────────────────────────────
    EmissionRateChanged {
        block_num: BlockNum,
        old_per_block: Asset,
        new_per_block: Asset,
    },

    // ── Cashout ──────────────────────────────────────────────────────────────
    AuthorReward {
        comment: CommentRef,
        author: AccountName,
        reward: Asset,
    },
    CurationReward {
        comment: CommentRef,
        curator: AccountName,
        reward: Asset,
    },
    BeneficiaryReward {
        comment: CommentRef,
        beneficiary: AccountName,
        reward: Asset,
    },
    /// Summary of one comment's share of one fund.
    CommentReward {
        comment: CommentRef,
        fund_reward: Asset,
        children_reward: Asset,
        to_parent: Asset,
        total_payout: Asset,
    },
    CommentPayoutUpdate {
        comment: CommentRef,
    },
}

/// Append-only event collector for one block.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<RewardEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RewardEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[RewardEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<RewardEvent> {
        self.events
    }
}
