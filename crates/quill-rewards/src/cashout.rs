use std::borrow::{Borrow, BorrowMut};
use std::collections::BTreeSet;

use quill_core::comment::Comment;
use quill_core::constants::{ONE_HUNDRED_PERCENT, TIME_NEVER};
use quill_core::error::QuillError;
use quill_core::event::{EventLog, RewardEvent};
use quill_core::fund::RewardFund;
use quill_core::params::{RewardParams, RulesEpoch};
use quill_core::types::{AccountName, Asset, CommentId, Percent, ShareType, Symbol, Timestamp};
use quill_math::{calculate_payout, curation_payout, curations_payout, decay_recent_claims, percent_of};
use quill_state::{ChainState, StakeConverter};
use tracing::{debug, info};

use crate::propagation::pending_rewards_for;

/// How one comment's share of one fund was split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommentPayout {
    /// Passed on to the parent, not yet paid to anyone.
    pub to_parent: ShareType,
    /// Paid out to author, beneficiaries and curators.
    pub claimed: ShareType,
}

/// Totals of one cashout pass over both funds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CashoutSummary {
    pub comments: Vec<CommentId>,
    pub paid_scr: Asset,
    pub paid_sp: Asset,
}

/// Pays out matured comments from the reward funds.
///
/// Comments, votes and statistics are read and written on the `ChainState`
/// that `S` borrows; every credit to an account goes through `S` as a
/// `StakeConverter`.
pub struct CashoutProcessor<'a, S = ChainState> {
    state: &'a mut S,
    params: &'a RewardParams,
    events: &'a mut EventLog,
}

impl<'a, S> CashoutProcessor<'a, S>
where
    S: StakeConverter + BorrowMut<ChainState>,
{
    pub fn new(state: &'a mut S, params: &'a RewardParams, events: &'a mut EventLog) -> Self {
        Self { state, params, events }
    }

    fn chain(&self) -> &ChainState {
        <S as Borrow<ChainState>>::borrow(self.state)
    }

    fn chain_mut(&mut self) -> &mut ChainState {
        <S as BorrowMut<ChainState>>::borrow_mut(self.state)
    }

    /// Pay every comment due at `now` from both funds, then archive them.
    pub fn process(
        &mut self,
        scr_fund: &mut RewardFund,
        sp_fund: &mut RewardFund,
        now: Timestamp,
        epoch: RulesEpoch,
    ) -> Result<CashoutSummary, QuillError> {
        let due = self.chain().comments_due(now);
        if due.is_empty() {
            return Ok(CashoutSummary { comments: due, paid_scr: Asset::scr(0), paid_sp: Asset::sp(0) });
        }

        let paid_scr = self.process_fund(scr_fund, &due, now, epoch)?;
        let paid_sp = self.process_fund(sp_fund, &due, now, epoch)?;

        for id in &due {
            self.close_comment_payout(*id, now)?;
        }

        info!(
            comments = due.len(),
            paid_scr = paid_scr.amount,
            paid_sp = paid_sp.amount,
            ?epoch,
            "cashout processed"
        );
        Ok(CashoutSummary { comments: due, paid_scr, paid_sp })
    }

    /// Apportion `fund` over the `due` batch and distribute the result.
    /// Returns the amount that left the fund.
    pub fn process_fund(
        &mut self,
        fund: &mut RewardFund,
        due: &[CommentId],
        now: Timestamp,
        epoch: RulesEpoch,
    ) -> Result<Asset, QuillError> {
        // An empty fund neither decays nor accumulates claims.
        if fund.balance.amount < 1 {
            return Ok(fund.balance.with_amount(0));
        }
        let rewards = self.fund_rewards(fund, due, now)?;
        let claimed = self.pay_batch(&rewards, fund.balance, epoch)?;

        fund.balance = fund.balance.saturating_sub(claimed);
        fund.last_update = now;
        debug!(symbol = %fund.symbol(), claimed = claimed.amount, balance = fund.balance.amount, "fund settled");
        Ok(claimed)
    }

    /// Decay `recent_claims`, then give each comment, in batch order, its
    /// claim's share of what the fund has left.
    fn fund_rewards(
        &self,
        fund: &mut RewardFund,
        due: &[CommentId],
        now: Timestamp,
    ) -> Result<Vec<(CommentId, ShareType)>, QuillError> {
        fund.recent_claims = decay_recent_claims(
            fund.recent_claims,
            now.saturating_sub(fund.last_update),
            self.params.recent_claims_decay_secs,
        );

        let mut available = fund.balance.amount;
        let mut rewards = Vec::with_capacity(due.len());
        for &id in due {
            let comment = self.chain().comment(id)?;
            let weighted = percent_of(comment.net_rshares, comment.reward_weight);
            let claim = self.params.author_reward_curve.evaluate(weighted);
            fund.recent_claims = fund.recent_claims.saturating_add(claim);

            let reward = calculate_payout(
                claim,
                fund.recent_claims,
                available,
                comment.max_accepted_payout,
                self.params.min_comment_payout_share,
            );
            available -= reward;
            rewards.push((id, reward));
        }
        Ok(rewards)
    }

    /// Pay a batch of fund rewards, deepest comments first, forwarding each
    /// reply's parent share upward under the rules of `epoch`. Nothing beyond
    /// `budget` is ever paid. Returns the total claimed.
    pub fn pay_batch(
        &mut self,
        rewards: &[(CommentId, ShareType)],
        budget: Asset,
        epoch: RulesEpoch,
    ) -> Result<Asset, QuillError> {
        let mut pending = {
            let batch = rewards
                .iter()
                .map(|(id, reward)| self.chain().comment(*id).map(|c| (c, *reward)))
                .collect::<Result<Vec<_>, QuillError>>()?;
            pending_rewards_for(epoch, batch)
        };

        let mut claimed: ShareType = 0;
        for id in self.payout_order(rewards.iter().map(|(id, _)| *id)) {
            let comment = self.chain().comment(id)?.clone();
            let headroom = budget.amount - claimed;
            let children_reward = pending.children_reward(&comment).min(headroom).max(0);
            let fund_reward = pending.fund_reward(&comment).min(headroom - children_reward).max(0);

            let paid = self.pay_for_comment(&comment, fund_reward, children_reward, budget.symbol)?;
            if paid.to_parent > 0 {
                if let Some(parent_id) = comment.parent {
                    pending.forward_to_parent(self.chain().comment(parent_id)?, paid.to_parent);
                }
            }
            claimed += paid.claimed;
        }
        Ok(budget.with_amount(claimed))
    }

    /// The batch plus all ancestors, ordered by depth then id, both descending.
    fn payout_order(&self, ids: impl Iterator<Item = CommentId>) -> Vec<CommentId> {
        let mut seen = BTreeSet::new();
        for id in ids {
            seen.insert(id);
            for ancestor in self.chain().ancestors(id) {
                if !seen.insert(ancestor.id) {
                    break;
                }
            }
        }

        let mut order: Vec<(u16, CommentId)> = seen
            .into_iter()
            .filter_map(|id| self.chain().comment(id).ok().map(|c| (c.depth, id)))
            .collect();
        order.sort_unstable_by(|a, b| b.cmp(a));
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Split one comment's rewards between curators, its parent,
    /// beneficiaries and the author.
    pub fn pay_for_comment(
        &mut self,
        comment: &Comment,
        fund_reward: ShareType,
        children_reward: ShareType,
        symbol: Symbol,
    ) -> Result<CommentPayout, QuillError> {
        if fund_reward < 1 && children_reward < 1 {
            return Ok(CommentPayout::default());
        }
        let comment_ref = comment.comment_ref();

        let curation_tokens = if comment.allow_curation_rewards {
            curations_payout(fund_reward, self.params.curation_reward_percent)
        } else {
            0
        };
        let curators = self.pay_curators(comment, curation_tokens, symbol)?;

        // Unclaimed curation stays with the author.
        let mut author_tokens = fund_reward - curators;
        let to_parent = if comment.is_root() {
            0
        } else {
            percent_of(author_tokens + children_reward, self.params.parent_comment_reward_percent)
        };
        author_tokens = author_tokens + children_reward - to_parent;

        let mut beneficiaries_total: ShareType = 0;
        for beneficiary in &comment.beneficiaries {
            let amount = percent_of(author_tokens, beneficiary.weight);
            if amount <= 0 {
                continue;
            }
            let reward = Asset::new(amount, symbol);
            self.pay_posting_reward(&beneficiary.account, reward, comment.percent_liquid);
            self.events.push(RewardEvent::BeneficiaryReward {
                comment: comment_ref.clone(),
                beneficiary: beneficiary.account.clone(),
                reward,
            });
            beneficiaries_total += amount;
        }

        let author_own = author_tokens - beneficiaries_total;
        if author_own > 0 {
            let reward = Asset::new(author_own, symbol);
            self.pay_posting_reward(&comment.author, reward, comment.percent_liquid);
            self.events.push(RewardEvent::AuthorReward {
                comment: comment_ref.clone(),
                author: comment.author.clone(),
                reward,
            });
        }

        let claimed = author_tokens + curators;
        let stats = self.chain_mut().comment_mut(comment.id)?.stats_mut(symbol);
        let add = |total: &mut Asset, amount: ShareType| *total = total.saturating_add(Asset::new(amount, symbol));
        add(&mut stats.fund_reward, fund_reward);
        add(&mut stats.children_reward, children_reward);
        add(&mut stats.to_parent_reward, to_parent);
        add(&mut stats.curator_payout, curators);
        add(&mut stats.beneficiary_payout, beneficiaries_total);
        add(&mut stats.author_payout, author_own);
        add(&mut stats.total_payout, claimed);

        self.events.push(RewardEvent::CommentReward {
            comment: comment_ref.clone(),
            fund_reward: Asset::new(fund_reward, symbol),
            children_reward: Asset::new(children_reward, symbol),
            to_parent: Asset::new(to_parent, symbol),
            total_payout: Asset::new(claimed, symbol),
        });
        debug!(
            comment = %comment_ref,
            %symbol,
            fund_reward,
            children_reward,
            to_parent,
            curators,
            author = author_own,
            beneficiaries = beneficiaries_total,
            "comment paid"
        );
        Ok(CommentPayout { to_parent, claimed })
    }

    /// Pay each positive-weight voter `curation_tokens * weight / total_weight`.
    /// Returns the amount actually handed out.
    fn pay_curators(&mut self, comment: &Comment, curation_tokens: ShareType, symbol: Symbol) -> Result<ShareType, QuillError> {
        if curation_tokens <= 0 || comment.total_vote_weight == 0 {
            return Ok(0);
        }
        let voters: Vec<(AccountName, u64)> = self
            .chain()
            .votes_for(comment.id)
            .filter(|v| v.weight > 0)
            .map(|v| (v.voter.clone(), v.weight))
            .collect();

        let mut paid: ShareType = 0;
        for (voter, weight) in voters {
            let amount = curation_payout(curation_tokens, comment.total_vote_weight, weight);
            if amount <= 0 {
                continue;
            }
            let reward = Asset::new(amount, symbol);
            match symbol {
                Symbol::Scr => self.state.increase_balance(&voter, reward),
                Symbol::Sp => {
                    self.state.create_scorumpower(&voter, reward);
                }
            }
            if let Ok(account) = self.chain_mut().account_mut(&voter) {
                account.record_curation_reward(reward);
            }
            self.events.push(RewardEvent::CurationReward {
                comment: comment.comment_ref(),
                curator: voter,
                reward,
            });
            paid += amount;
        }
        Ok(paid)
    }

    /// Author and beneficiary payouts. Staked-power rewards are staked in
    /// full; liquid-token rewards keep `percent_liquid / 2` liquid and stake
    /// the rest.
    fn pay_posting_reward(&mut self, account: &AccountName, reward: Asset, percent_liquid: Percent) {
        match reward.symbol {
            Symbol::Sp => {
                self.state.create_scorumpower(account, reward);
            }
            Symbol::Scr => {
                let liquid = liquid_part(reward.amount, percent_liquid);
                if liquid > 0 {
                    self.state.increase_balance(account, Asset::scr(liquid));
                }
                if reward.amount > liquid {
                    self.state.create_scorumpower(account, Asset::scr(reward.amount - liquid));
                }
            }
        }
        if let Ok(acc) = self.chain_mut().account_mut(account) {
            acc.record_posting_reward(reward);
        }
    }

    /// Reset the vote aggregates and archive the comment. Runs once per
    /// comment, at its own maturity, whatever it was paid.
    pub fn close_comment_payout(&mut self, id: CommentId, now: Timestamp) -> Result<(), QuillError> {
        let comment = self.chain_mut().comment_mut(id)?;
        comment.children_abs_rshares = 0;
        comment.abs_rshares = 0;
        comment.total_vote_weight = 0;
        comment.last_payout = now;
        let comment_ref = comment.comment_ref();

        self.chain_mut().set_cashout_time(id, TIME_NEVER)?;
        self.events.push(RewardEvent::CommentPayoutUpdate { comment: comment_ref });
        Ok(())
    }
}

/// `amount * percent_liquid / 200%`, floored.
pub fn liquid_part(amount: ShareType, percent_liquid: Percent) -> ShareType {
    if amount <= 0 {
        return 0;
    }
    (amount as i128 * percent_liquid as i128 / (2 * ONE_HUNDRED_PERCENT as i128)) as ShareType
}
