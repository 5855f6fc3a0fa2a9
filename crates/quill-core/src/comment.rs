use serde::{Deserialize, Serialize};

use crate::constants::{ONE_HUNDRED_PERCENT, TIME_NEVER};
use crate::error::QuillError;
use crate::types::{AccountName, Asset, CommentId, CommentRef, Percent, Rshares, Symbol, Timestamp};

// ── Beneficiaries ────────────────────────────────────────────────────────────

/// Account that receives `weight` of the author's share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub account: AccountName,
    pub weight: Percent,
}

impl Beneficiary {
    pub fn new(account: impl Into<String>, weight: Percent) -> Self {
        Self { account: AccountName::new(account), weight }
    }
}

/// Structural checks on a beneficiary list: non-empty, at most `max`
/// entries, each weight and the total at most 100%, accounts strictly
/// ascending (which also makes them unique).
pub fn validate_beneficiaries(list: &[Beneficiary], max: usize) -> Result<(), QuillError> {
    if list.is_empty() {
        return Err(QuillError::EmptyBeneficiaries);
    }
    if list.len() > max {
        return Err(QuillError::TooManyBeneficiaries { max, got: list.len() });
    }

    let mut sum: u32 = 0;
    for b in list {
        if b.weight > ONE_HUNDRED_PERCENT {
            return Err(QuillError::BeneficiaryWeightTooLarge {
                account: b.account.to_string(),
                weight: b.weight,
            });
        }
        sum += b.weight as u32;
        if sum > ONE_HUNDRED_PERCENT as u32 {
            return Err(QuillError::BeneficiariesSumExceeded { sum });
        }
    }

    if list.windows(2).any(|w| w[0].account >= w[1].account) {
        return Err(QuillError::BeneficiariesNotSorted);
    }
    Ok(())
}

// ── Comment ──────────────────────────────────────────────────────────────────

/// Per-symbol payout history of a comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentStatistics {
    pub total_payout: Asset,
    pub author_payout: Asset,
    pub curator_payout: Asset,
    pub beneficiary_payout: Asset,
    /// This comment's own share of the fund.
    pub fund_reward: Asset,
    /// Received from descendants.
    pub children_reward: Asset,
    /// Forwarded to the parent.
    pub to_parent_reward: Asset,
}

impl CommentStatistics {
    pub fn new(symbol: Symbol) -> Self {
        let zero = Asset::zero(symbol);
        Self {
            total_payout: zero,
            author_payout: zero,
            curator_payout: zero,
            beneficiary_payout: zero,
            fund_reward: zero,
            children_reward: zero,
            to_parent_reward: zero,
        }
    }
}

/// A post (depth 0) or reply in the comment forest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: AccountName,
    pub permlink: String,
    /// `None` for a root post.
    pub parent: Option<CommentId>,
    pub root: CommentId,
    pub depth: u16,
    /// Number of descendants.
    pub children: u32,
    pub created: Timestamp,
    /// Maturity instant; `TIME_NEVER` once archived.
    pub cashout_time: Timestamp,
    pub last_payout: Timestamp,

    // ── Reward shares ────────────────────────────────────────────────────────
    pub net_rshares: Rshares,
    pub abs_rshares: Rshares,
    /// Positive rshares only; the input of the curation curve.
    pub vote_rshares: Rshares,
    pub children_abs_rshares: Rshares,
    pub total_vote_weight: u64,
    pub net_votes: i32,
    /// Scales rshares before the reward curve.
    pub reward_weight: Percent,

    // ── Options ──────────────────────────────────────────────────────────────
    /// Upper bound of a single fund payout.
    pub max_accepted_payout: i64,
    /// Share of the liquid fund's author payout that stays liquid, halved;
    /// the rest is converted to stake.
    pub percent_liquid: Percent,
    pub allow_votes: bool,
    pub allow_curation_rewards: bool,
    pub beneficiaries: Vec<Beneficiary>,

    pub stats_scr: CommentStatistics,
    pub stats_sp: CommentStatistics,
}

impl Comment {
    pub fn new(
        id: CommentId,
        author: AccountName,
        permlink: String,
        parent: Option<(CommentId, CommentId, u16)>,
        created: Timestamp,
        cashout_window_secs: u32,
    ) -> Self {
        let (parent, root, depth) = match parent {
            Some((parent_id, root_id, parent_depth)) => (Some(parent_id), root_id, parent_depth.saturating_add(1)),
            None => (None, id, 0),
        };
        Self {
            id,
            author,
            permlink,
            parent,
            root,
            depth,
            children: 0,
            created,
            cashout_time: created.saturating_add(cashout_window_secs as i64),
            last_payout: 0,
            net_rshares: 0,
            abs_rshares: 0,
            vote_rshares: 0,
            children_abs_rshares: 0,
            total_vote_weight: 0,
            net_votes: 0,
            reward_weight: ONE_HUNDRED_PERCENT,
            max_accepted_payout: i64::MAX,
            percent_liquid: ONE_HUNDRED_PERCENT,
            allow_votes: true,
            allow_curation_rewards: true,
            beneficiaries: Vec::new(),
            stats_scr: CommentStatistics::new(Symbol::Scr),
            stats_sp: CommentStatistics::new(Symbol::Sp),
        }
    }

    pub fn comment_ref(&self) -> CommentRef {
        CommentRef { author: self.author.clone(), permlink: self.permlink.clone() }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_archived(&self) -> bool {
        self.cashout_time == TIME_NEVER
    }

    pub fn has_votes(&self) -> bool {
        self.abs_rshares > 0
    }

    pub fn stats_mut(&mut self, symbol: Symbol) -> &mut CommentStatistics {
        match symbol {
            Symbol::Scr => &mut self.stats_scr,
            Symbol::Sp => &mut self.stats_sp,
        }
    }

    pub fn stats(&self, symbol: Symbol) -> &CommentStatistics {
        match symbol {
            Symbol::Scr => &self.stats_scr,
            Symbol::Sp => &self.stats_sp,
        }
    }
}

/// Optional settings an author may apply before the first vote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentOptions {
    pub max_accepted_payout: Option<i64>,
    pub percent_liquid: Option<Percent>,
    pub allow_votes: Option<bool>,
    pub allow_curation_rewards: Option<bool>,
    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,
}

// ── Vote ─────────────────────────────────────────────────────────────────────

/// One voter's standing vote on one comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentVote {
    pub comment: CommentId,
    pub voter: AccountName,
    /// Curation weight; 0 for downvotes and changed votes.
    pub weight: u64,
    pub rshares: Rshares,
    /// Requested weight in signed basis points.
    pub vote_percent: i16,
    pub last_update: Timestamp,
    pub num_changes: u16,
}
