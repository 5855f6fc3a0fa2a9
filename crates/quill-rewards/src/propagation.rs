//! Bookkeeping for rewards that flow from a reply up to its parent during
//! one cashout batch.
//!
//! Two rule sets exist and are kept as separate types. Before the per-edge
//! hardfork both the fund rewards and the pending parent shares are keyed by
//! author name, so comments by the same author inside one tree alias each
//! other. From the hardfork on, both are keyed by comment id.

use std::collections::BTreeMap;

use quill_core::comment::Comment;
use quill_core::params::RulesEpoch;
use quill_core::types::{AccountName, CommentId, ShareType};

/// Where a batch's fund rewards and in-flight parent shares are looked up.
pub trait PendingRewards {
    /// Fund reward credited to `comment` in this batch.
    fn fund_reward(&self, comment: &Comment) -> ShareType;

    /// Parent shares received from already processed replies.
    fn children_reward(&self, comment: &Comment) -> ShareType;

    /// Queue `amount` for `parent`.
    fn forward_to_parent(&mut self, parent: &Comment, amount: ShareType);
}

// ── Legacy: keyed by author ──────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LegacyAuthorWallet {
    fund: BTreeMap<AccountName, ShareType>,
    pending: BTreeMap<AccountName, ShareType>,
}

impl LegacyAuthorWallet {
    /// `batch` is in cashout order; the first comment of each author sets
    /// that author's fund reward for the whole batch.
    pub fn new<'a>(batch: impl IntoIterator<Item = (&'a Comment, ShareType)>) -> Self {
        let mut fund = BTreeMap::new();
        for (comment, reward) in batch {
            fund.entry(comment.author.clone()).or_insert(reward);
        }
        Self { fund, pending: BTreeMap::new() }
    }
}

impl PendingRewards for LegacyAuthorWallet {
    fn fund_reward(&self, comment: &Comment) -> ShareType {
        self.fund.get(&comment.author).copied().unwrap_or(0)
    }

    fn children_reward(&self, comment: &Comment) -> ShareType {
        self.pending.get(&comment.author).copied().unwrap_or(0)
    }

    fn forward_to_parent(&mut self, parent: &Comment, amount: ShareType) {
        *self.pending.entry(parent.author.clone()).or_insert(0) += amount;
    }
}

// ── Per edge: keyed by comment ───────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct PerEdgeLedger {
    fund: BTreeMap<CommentId, ShareType>,
    pending: BTreeMap<CommentId, ShareType>,
}

impl PerEdgeLedger {
    pub fn new<'a>(batch: impl IntoIterator<Item = (&'a Comment, ShareType)>) -> Self {
        let fund = batch.into_iter().map(|(c, reward)| (c.id, reward)).collect();
        Self { fund, pending: BTreeMap::new() }
    }
}

impl PendingRewards for PerEdgeLedger {
    fn fund_reward(&self, comment: &Comment) -> ShareType {
        self.fund.get(&comment.id).copied().unwrap_or(0)
    }

    fn children_reward(&self, comment: &Comment) -> ShareType {
        self.pending.get(&comment.id).copied().unwrap_or(0)
    }

    fn forward_to_parent(&mut self, parent: &Comment, amount: ShareType) {
        *self.pending.entry(parent.id).or_insert(0) += amount;
    }
}

/// Ledger for the rules in force at `epoch`.
pub fn pending_rewards_for<'a>(
    epoch: RulesEpoch,
    batch: impl IntoIterator<Item = (&'a Comment, ShareType)>,
) -> Box<dyn PendingRewards> {
    match epoch {
        RulesEpoch::Legacy => Box::new(LegacyAuthorWallet::new(batch)),
        RulesEpoch::PerEdge => Box::new(PerEdgeLedger::new(batch)),
    }
}
