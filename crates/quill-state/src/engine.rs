use quill_core::account::Delegation;
use quill_core::comment::{validate_beneficiaries, Comment, CommentOptions, CommentVote};
use quill_core::constants::{MAX_PERMLINK_LENGTH, ONE_HUNDRED_PERCENT, TIME_NEVER};
use quill_core::error::QuillError;
use quill_core::event::{EventLog, RewardEvent};
use quill_core::operation::Operation;
use quill_core::params::RewardParams;
use quill_core::types::{AccountName, Asset, CommentId, CommentRef, Symbol, Timestamp};
use quill_math::{abs_reward_shares, max_vote_weight, restoring_power, reverse_auction_weight, used_power};
use tracing::{debug, info};

use crate::store::ChainState;

/// Validates and applies user operations to the chain state.
///
/// Every operation checks all of its preconditions before touching state,
/// so a rejected operation leaves no trace.
pub struct StateEngine<'a> {
    state: &'a mut ChainState,
    params: &'a RewardParams,
}

impl<'a> StateEngine<'a> {
    pub fn new(state: &'a mut ChainState, params: &'a RewardParams) -> Self {
        Self { state, params }
    }

    /// Validate and apply one operation at block time `now`.
    pub fn apply(&mut self, op: &Operation, now: Timestamp, events: &mut EventLog) -> Result<(), QuillError> {
        match op {
            Operation::Comment { author, permlink, parent } => {
                self.create_comment(author, permlink, parent.as_ref(), now).map(|_| ())
            }
            Operation::CommentOptions { author, permlink, options } => {
                self.set_comment_options(&CommentRef { author: author.clone(), permlink: permlink.clone() }, options)
            }
            Operation::Vote { voter, author, permlink, weight } => self.apply_vote(
                voter,
                &CommentRef { author: author.clone(), permlink: permlink.clone() },
                *weight,
                now,
                events,
            ),
            Operation::DelegateScorumpower { delegator, delegatee, scorumpower } => {
                self.delegate(delegator, delegatee, *scorumpower)
            }
        }
    }

    // ── Comment ──────────────────────────────────────────────────────────────

    pub fn create_comment(
        &mut self,
        author: &AccountName,
        permlink: &str,
        parent: Option<&CommentRef>,
        now: Timestamp,
    ) -> Result<CommentId, QuillError> {
        self.state.account(author)?;
        if permlink.is_empty() || permlink.len() > MAX_PERMLINK_LENGTH {
            return Err(QuillError::InvalidPermlink(permlink.to_string()));
        }
        let key = CommentRef { author: author.clone(), permlink: permlink.to_string() };
        if self.state.find_comment(&key).is_ok() {
            return Err(QuillError::DuplicateComment(key.to_string()));
        }

        let parent_link = match parent {
            Some(parent_ref) => {
                let parent_id = self
                    .state
                    .find_comment(parent_ref)
                    .map_err(|_| QuillError::UnknownParent(parent_ref.to_string()))?;
                let p = self.state.comment(parent_id)?;
                let max = self.params.max_comment_depth;
                match p.depth.checked_add(1) {
                    Some(depth) if depth <= max => {}
                    _ => return Err(QuillError::CommentTooDeep { depth: p.depth.saturating_add(1), max }),
                }
                Some((p.id, p.root, p.depth))
            }
            None => None,
        };

        let id = self.state.next_comment_id();
        let comment = Comment::new(
            id,
            author.clone(),
            permlink.to_string(),
            parent_link,
            now,
            self.params.cashout_window_secs,
        );
        self.state.insert_comment(comment)?;

        let ancestors: Vec<CommentId> = self.state.ancestors(id).map(|c| c.id).collect();
        for ancestor in ancestors {
            let c = self.state.comment_mut(ancestor)?;
            c.children = c.children.saturating_add(1);
        }

        debug!(comment = %key, id = %id, "comment created");
        Ok(id)
    }

    pub fn set_comment_options(&mut self, key: &CommentRef, options: &CommentOptions) -> Result<(), QuillError> {
        let id = self.state.find_comment(key)?;
        let comment = self.state.comment(id)?;

        if comment.has_votes() {
            return Err(if options.beneficiaries.is_empty() {
                QuillError::OptionsAfterVotes
            } else {
                QuillError::BeneficiariesAfterVotes
            });
        }
        if let Some(max) = options.max_accepted_payout {
            if max < 0 {
                return Err(QuillError::NegativeAsset);
            }
            if max > comment.max_accepted_payout {
                return Err(QuillError::MaxPayoutIncrease);
            }
        }
        if let Some(pct) = options.percent_liquid {
            if pct > ONE_HUNDRED_PERCENT {
                return Err(QuillError::InvalidPercent(pct));
            }
        }
        if options.allow_votes == Some(true) && !comment.allow_votes
            || options.allow_curation_rewards == Some(true) && !comment.allow_curation_rewards
        {
            return Err(QuillError::FlagReenabled);
        }
        if !options.beneficiaries.is_empty() {
            if !comment.beneficiaries.is_empty() {
                return Err(QuillError::BeneficiariesAlreadySet);
            }
            validate_beneficiaries(&options.beneficiaries, self.params.max_comment_beneficiaries)?;
            for b in &options.beneficiaries {
                self.state.account(&b.account)?;
            }
        }

        let comment = self.state.comment_mut(id)?;
        if let Some(max) = options.max_accepted_payout {
            comment.max_accepted_payout = max;
        }
        if let Some(pct) = options.percent_liquid {
            comment.percent_liquid = pct;
        }
        if let Some(allow) = options.allow_votes {
            comment.allow_votes = allow;
        }
        if let Some(allow) = options.allow_curation_rewards {
            comment.allow_curation_rewards = allow;
        }
        if !options.beneficiaries.is_empty() {
            comment.beneficiaries = options.beneficiaries.clone();
        }
        Ok(())
    }

    // ── Vote ─────────────────────────────────────────────────────────────────

    /// Spend voting power on `key` and record the resulting rshares.
    ///
    /// A repeat vote by the same voter replaces the previous one: its old
    /// rshares are taken back out of the comment and its ancestors before
    /// the new ones go in.
    pub fn apply_vote(
        &mut self,
        voter: &AccountName,
        key: &CommentRef,
        weight: i16,
        now: Timestamp,
        events: &mut EventLog,
    ) -> Result<(), QuillError> {
        let p = self.params;

        // ── Checks ───────────────────────────────────────────────────────────
        if weight.unsigned_abs() > ONE_HUNDRED_PERCENT {
            return Err(QuillError::InvalidVoteWeight(weight as i32));
        }
        let id = self.state.find_comment(key)?;
        let comment = self.state.comment(id)?;
        if comment.is_archived() {
            return Err(QuillError::VoteOnArchivedComment);
        }
        // Flags and removals stay legal when votes are disabled.
        if weight > 0 && !comment.allow_votes {
            return Err(QuillError::VotesDisabled);
        }

        let account = self.state.account(voter)?;
        if now.saturating_sub(account.last_vote_time) < p.min_vote_interval_secs as i64 {
            return Err(QuillError::VoteTooFrequent { min_secs: p.min_vote_interval_secs });
        }

        let current_power = restoring_power(account.voting_power, now, account.last_vote_time, p.vote_regeneration_secs);
        if current_power == 0 {
            return Err(QuillError::NoVotingPower);
        }
        let used = used_power(current_power, weight, p.max_votes_per_day_voting_power_rate, p.vote_regeneration_secs);
        let abs_rshares = abs_reward_shares(used, account.effective_scorumpower());
        if weight != 0 && abs_rshares <= p.vote_dust_threshold {
            return Err(QuillError::DustVote { rshares: abs_rshares });
        }
        let rshares = if weight < 0 { -abs_rshares } else { abs_rshares };

        let lockout_start = comment.cashout_time.saturating_sub(p.upvote_lockout_secs as i64);
        let previous = self.state.vote(id, voter).cloned();
        match &previous {
            None => {
                if weight == 0 {
                    return Err(QuillError::ZeroWeightWithoutVote);
                }
                if rshares > 0 && now >= lockout_start {
                    return Err(QuillError::UpvoteLockout { lockout_secs: p.upvote_lockout_secs });
                }
            }
            Some(prev) => {
                if prev.num_changes >= p.max_vote_changes {
                    return Err(QuillError::TooManyVoteChanges { max: p.max_vote_changes });
                }
                if prev.vote_percent == weight {
                    return Err(QuillError::UnchangedVote);
                }
                if rshares > prev.rshares && now >= lockout_start {
                    return Err(QuillError::UpvoteLockout { lockout_secs: p.upvote_lockout_secs });
                }
            }
        }

        // ── Voter ────────────────────────────────────────────────────────────
        let account = self.state.account_mut(voter)?;
        account.voting_power = current_power - used;
        account.last_vote_time = now;

        // ── Comment ──────────────────────────────────────────────────────────
        let old_rshares = previous.as_ref().map_or(0, |v| v.rshares);
        let old_weight = previous.as_ref().map_or(0, |v| v.weight);
        let abs_delta = abs_rshares - old_rshares.abs();

        let comment = self.state.comment_mut(id)?;
        comment.net_rshares = comment.net_rshares - old_rshares + rshares;
        comment.abs_rshares = (comment.abs_rshares + abs_delta).max(0);
        comment.net_votes = comment.net_votes - old_rshares.signum() as i32 + rshares.signum() as i32;

        let mut vote_weight = 0u64;
        if previous.is_some() {
            comment.total_vote_weight = comment.total_vote_weight.saturating_sub(old_weight);
        } else if rshares > 0 && comment.allow_curation_rewards {
            let old_vote_rshares = comment.vote_rshares;
            comment.vote_rshares = comment.vote_rshares.saturating_add(rshares);
            let max_weight = max_vote_weight(comment.vote_rshares, old_vote_rshares, p.curation_reward_curve);
            vote_weight = reverse_auction_weight(max_weight, now, comment.created, p.reverse_auction_window_secs);
            comment.total_vote_weight = comment.total_vote_weight.saturating_add(max_weight);
        }

        let created = comment.created;
        let cashout_time = comment.cashout_time;
        if cashout_time != TIME_NEVER {
            let window_end = created.saturating_add(p.cashout_window_secs as i64);
            if window_end != cashout_time {
                self.state.set_cashout_time(id, window_end)?;
            }
        }

        let ancestors: Vec<CommentId> = self.state.ancestors(id).map(|c| c.id).collect();
        for ancestor in ancestors {
            let a = self.state.comment_mut(ancestor)?;
            a.children_abs_rshares = (a.children_abs_rshares + abs_delta).max(0);
        }

        // ── Vote record ──────────────────────────────────────────────────────
        self.state.put_vote(CommentVote {
            comment: id,
            voter: voter.clone(),
            weight: vote_weight,
            rshares,
            vote_percent: weight,
            last_update: now,
            num_changes: previous.as_ref().map_or(0, |v| v.num_changes + 1),
        });

        info!(voter = %voter, comment = %key, weight, rshares, "vote applied");
        events.push(RewardEvent::VoteApplied {
            voter: voter.clone(),
            comment: key.clone(),
            weight,
            rshares,
        });
        Ok(())
    }

    // ── Delegation ───────────────────────────────────────────────────────────

    pub fn delegate(&mut self, delegator: &AccountName, delegatee: &AccountName, amount: Asset) -> Result<(), QuillError> {
        if amount.amount < 0 {
            return Err(QuillError::NegativeAsset);
        }
        if amount.symbol != Symbol::Sp {
            return Err(QuillError::Other(format!("delegation must be in SP, got {amount}")));
        }
        if delegator == delegatee {
            return Err(QuillError::Other("cannot delegate to self".into()));
        }
        self.state.account(delegatee)?;
        let available = self.state.account(delegator)?.available_for_delegation();
        let previous = self.state.delegation(delegator, delegatee).map_or(0, |d| d.scorumpower.amount);
        let delta = amount.amount - previous;
        if delta > available {
            return Err(QuillError::InsufficientPower { need: delta, have: available });
        }

        let from = self.state.account_mut(delegator)?;
        from.delegated_scorumpower = Asset::sp(from.delegated_scorumpower.amount + delta);
        let to = self.state.account_mut(delegatee)?;
        to.received_scorumpower = Asset::sp((to.received_scorumpower.amount + delta).max(0));
        self.state.put_delegation(Delegation {
            delegator: delegator.clone(),
            delegatee: delegatee.clone(),
            scorumpower: amount,
        });
        debug!(delegator = %delegator, delegatee = %delegatee, amount = %amount, "delegation set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::account::Account;
    use quill_core::comment::Beneficiary;

    const POWER: i64 = 1_000_000_000;

    fn params() -> RewardParams {
        RewardParams { vote_dust_threshold: 0, ..RewardParams::testnet() }
    }

    fn setup() -> ChainState {
        let mut state = ChainState::new();
        for name in ["alice", "bob", "carol", "dave"] {
            let mut acc = Account::new(name.into(), 0);
            acc.scorumpower = Asset::sp(POWER);
            state.create_account(acc).unwrap();
        }
        state
    }

    fn post(state: &mut ChainState, params: &RewardParams) -> CommentRef {
        StateEngine::new(state, params).create_comment(&"alice".into(), "post", None, 100).unwrap();
        CommentRef::new("alice", "post")
    }

    #[test]
    fn reply_links_to_parent_and_bumps_children() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut engine = StateEngine::new(&mut state, &params);
        let reply = engine.create_comment(&"bob".into(), "re", Some(&root), 110).unwrap();
        engine.create_comment(&"carol".into(), "re2", Some(&CommentRef::new("bob", "re")), 120).unwrap();

        assert_eq!(state.comment(reply).unwrap().depth, 1);
        assert_eq!(state.comment(CommentId(0)).unwrap().children, 2);
        assert_eq!(state.comment(reply).unwrap().children, 1);
    }

    #[test]
    fn reply_past_max_depth_is_rejected() {
        let params = RewardParams { max_comment_depth: 1, ..params() };
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut engine = StateEngine::new(&mut state, &params);
        engine.create_comment(&"bob".into(), "re", Some(&root), 110).unwrap();
        let err = engine
            .create_comment(&"carol".into(), "re2", Some(&CommentRef::new("bob", "re")), 120)
            .unwrap_err();
        assert_eq!(err, QuillError::CommentTooDeep { depth: 2, max: 1 });
    }

    #[test]
    fn reply_to_deepest_representable_comment_is_rejected() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        state.comment_mut(CommentId(0)).unwrap().depth = u16::MAX;
        let err = StateEngine::new(&mut state, &params)
            .create_comment(&"bob".into(), "re", Some(&root), 110)
            .unwrap_err();
        assert_eq!(err, QuillError::CommentTooDeep { depth: u16::MAX, max: params.max_comment_depth });
        assert_eq!(state.comments().len(), 1);
    }

    #[test]
    fn reply_to_unknown_parent_is_rejected() {
        let params = params();
        let mut state = setup();
        let mut engine = StateEngine::new(&mut state, &params);
        let err = engine
            .create_comment(&"bob".into(), "re", Some(&CommentRef::new("alice", "nope")), 10)
            .unwrap_err();
        assert!(matches!(err, QuillError::UnknownParent(_)));
    }

    #[test]
    fn vote_spends_power_and_adds_rshares() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut events = EventLog::new();
        StateEngine::new(&mut state, &params)
            .apply_vote(&"bob".into(), &root, 10_000, 200, &mut events)
            .unwrap();

        // 2% of full power: 1e9 * 200 / 10000
        let comment = state.comment(CommentId(0)).unwrap();
        assert_eq!(comment.net_rshares, 20_000_000);
        assert_eq!(comment.abs_rshares, 20_000_000);
        assert_eq!(comment.net_votes, 1);
        assert_eq!(state.account(&"bob".into()).unwrap().voting_power, 9_800);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn replacing_a_vote_matches_casting_only_the_second() {
        let params = params();

        let mut replaced = setup();
        let root = post(&mut replaced, &params);
        let mut events = EventLog::new();
        let mut engine = StateEngine::new(&mut replaced, &params);
        engine.apply_vote(&"bob".into(), &root, 10_000, 200, &mut events).unwrap();
        engine.apply_vote(&"bob".into(), &root, -5_000, 200_000, &mut events).unwrap();

        let mut direct = setup();
        let root = post(&mut direct, &params);
        // Same voting power state as the second vote above saw.
        direct.account_mut(&"bob".into()).unwrap().voting_power = 9_800;
        direct.account_mut(&"bob".into()).unwrap().last_vote_time = 200;
        StateEngine::new(&mut direct, &params)
            .apply_vote(&"bob".into(), &root, -5_000, 200_000, &mut events)
            .unwrap();

        let a = replaced.comment(CommentId(0)).unwrap();
        let b = direct.comment(CommentId(0)).unwrap();
        assert_eq!(a.net_rshares, b.net_rshares);
        assert_eq!(a.abs_rshares, b.abs_rshares);
        assert!(a.net_rshares < 0);
        assert_eq!(replaced.vote(CommentId(0), &"bob".into()).unwrap().num_changes, 1);
    }

    #[test]
    fn vote_propagates_abs_rshares_to_every_ancestor() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut events = EventLog::new();
        let mut engine = StateEngine::new(&mut state, &params);
        engine.create_comment(&"bob".into(), "c1", Some(&root), 110).unwrap();
        engine.create_comment(&"carol".into(), "c2", Some(&CommentRef::new("bob", "c1")), 120).unwrap();
        engine.apply_vote(&"dave".into(), &CommentRef::new("carol", "c2"), 10_000, 200, &mut events).unwrap();
        engine.apply_vote(&"dave".into(), &CommentRef::new("carol", "c2"), 0, 210, &mut events).unwrap();

        // Removal takes the contribution back out of every ancestor.
        assert_eq!(state.comment(CommentId(0)).unwrap().children_abs_rshares, 0);
        assert_eq!(state.comment(CommentId(1)).unwrap().children_abs_rshares, 0);
        assert_eq!(state.comment(CommentId(2)).unwrap().abs_rshares, 0);
    }

    #[test]
    fn ancestors_see_child_votes() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut events = EventLog::new();
        let mut engine = StateEngine::new(&mut state, &params);
        engine.create_comment(&"bob".into(), "c1", Some(&root), 110).unwrap();
        engine.create_comment(&"carol".into(), "c2", Some(&CommentRef::new("bob", "c1")), 120).unwrap();
        engine.apply_vote(&"dave".into(), &CommentRef::new("carol", "c2"), 10_000, 200, &mut events).unwrap();

        assert_eq!(state.comment(CommentId(0)).unwrap().children_abs_rshares, 20_000_000);
        assert_eq!(state.comment(CommentId(1)).unwrap().children_abs_rshares, 20_000_000);
        assert_eq!(state.comment(CommentId(2)).unwrap().children_abs_rshares, 0);
    }

    #[test]
    fn zero_weight_without_prior_vote_is_rejected() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let err = StateEngine::new(&mut state, &params)
            .apply_vote(&"bob".into(), &root, 0, 200, &mut EventLog::new())
            .unwrap_err();
        assert_eq!(err, QuillError::ZeroWeightWithoutVote);
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let err = StateEngine::new(&mut state, &params)
            .apply_vote(&"bob".into(), &root, 10_001, 200, &mut EventLog::new())
            .unwrap_err();
        assert_eq!(err, QuillError::InvalidVoteWeight(10_001));
    }

    #[test]
    fn upvote_inside_lockout_is_rejected_but_downvote_allowed() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        // cashout at 100 + 3600, lockout begins 300 s earlier.
        let late = 100 + 3_600 - 100;
        let mut engine = StateEngine::new(&mut state, &params);
        let err = engine.apply_vote(&"bob".into(), &root, 10_000, late, &mut EventLog::new()).unwrap_err();
        assert!(matches!(err, QuillError::UpvoteLockout { .. }));
        engine.apply_vote(&"carol".into(), &root, -10_000, late, &mut EventLog::new()).unwrap();
    }

    #[test]
    fn lowering_a_vote_inside_lockout_is_allowed() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let late = 100 + 3_600 - 100;
        let mut engine = StateEngine::new(&mut state, &params);
        engine.apply_vote(&"bob".into(), &root, 10_000, 200, &mut EventLog::new()).unwrap();
        engine.apply_vote(&"bob".into(), &root, 1_000, late, &mut EventLog::new()).unwrap();
        let err = engine.apply_vote(&"bob".into(), &root, 10_000, late + 10, &mut EventLog::new()).unwrap_err();
        assert!(matches!(err, QuillError::UpvoteLockout { .. }));
    }

    #[test]
    fn dust_stake_cannot_vote() {
        let params = RewardParams { vote_dust_threshold: 50_000_000, ..RewardParams::testnet() };
        let mut state = setup();
        let root = post(&mut state, &params);
        let err = StateEngine::new(&mut state, &params)
            .apply_vote(&"bob".into(), &root, 10_000, 200, &mut EventLog::new())
            .unwrap_err();
        assert_eq!(err, QuillError::DustVote { rshares: 20_000_000 });
    }

    #[test]
    fn vote_changes_are_limited_and_must_differ() {
        let params = RewardParams { max_vote_changes: 2, ..params() };
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut engine = StateEngine::new(&mut state, &params);
        let bob = AccountName::from("bob");
        engine.apply_vote(&bob, &root, 1_000, 200, &mut EventLog::new()).unwrap();
        assert_eq!(
            engine.apply_vote(&bob, &root, 1_000, 210, &mut EventLog::new()),
            Err(QuillError::UnchangedVote)
        );
        engine.apply_vote(&bob, &root, 2_000, 220, &mut EventLog::new()).unwrap();
        engine.apply_vote(&bob, &root, 3_000, 230, &mut EventLog::new()).unwrap();
        assert_eq!(
            engine.apply_vote(&bob, &root, 4_000, 240, &mut EventLog::new()),
            Err(QuillError::TooManyVoteChanges { max: 2 })
        );
    }

    #[test]
    fn votes_closer_than_min_interval_are_rejected() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut engine = StateEngine::new(&mut state, &params);
        engine.create_comment(&"bob".into(), "other", None, 150).unwrap();
        engine.apply_vote(&"carol".into(), &root, 1_000, 200, &mut EventLog::new()).unwrap();
        let err = engine
            .apply_vote(&"carol".into(), &CommentRef::new("bob", "other"), 1_000, 201, &mut EventLog::new())
            .unwrap_err();
        assert_eq!(err, QuillError::VoteTooFrequent { min_secs: 3 });
    }

    #[test]
    fn archived_comment_rejects_votes() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        state.set_cashout_time(CommentId(0), TIME_NEVER).unwrap();
        let err = StateEngine::new(&mut state, &params)
            .apply_vote(&"bob".into(), &root, 1_000, 200, &mut EventLog::new())
            .unwrap_err();
        assert_eq!(err, QuillError::VoteOnArchivedComment);
    }

    #[test]
    fn disabled_votes_still_allow_flags_and_removals() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut events = EventLog::new();
        let mut engine = StateEngine::new(&mut state, &params);
        let options = CommentOptions { allow_votes: Some(false), ..CommentOptions::default() };
        engine.set_comment_options(&root, &options).unwrap();

        let err = engine.apply_vote(&"bob".into(), &root, 10_000, 200, &mut events).unwrap_err();
        assert_eq!(err, QuillError::VotesDisabled);
        engine.apply_vote(&"carol".into(), &root, -10_000, 200, &mut events).unwrap();
        assert!(state.comment(CommentId(0)).unwrap().net_rshares < 0);

        StateEngine::new(&mut state, &params)
            .apply_vote(&"carol".into(), &root, 0, 400, &mut events)
            .unwrap();
        let comment = state.comment(CommentId(0)).unwrap();
        assert_eq!(comment.net_rshares, 0);
        assert_eq!(comment.net_votes, 0);
    }

    #[test]
    fn early_vote_earns_discounted_curation_weight() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut engine = StateEngine::new(&mut state, &params);
        // Half-way through the 30 minute reverse auction.
        engine.apply_vote(&"bob".into(), &root, 10_000, 100 + 900, &mut EventLog::new()).unwrap();
        let vote = state.vote(CommentId(0), &"bob".into()).unwrap();
        let comment = state.comment(CommentId(0)).unwrap();
        assert_eq!(comment.total_vote_weight, 20_000_000);
        assert_eq!(vote.weight, 10_000_000);
    }

    #[test]
    fn delegated_power_moves_voting_weight() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut engine = StateEngine::new(&mut state, &params);
        engine.delegate(&"bob".into(), &"carol".into(), Asset::sp(POWER / 2)).unwrap();
        engine.apply_vote(&"carol".into(), &root, 10_000, 200, &mut EventLog::new()).unwrap();
        assert_eq!(state.comment(CommentId(0)).unwrap().net_rshares, 30_000_000);
        assert_eq!(
            StateEngine::new(&mut state, &params).delegate(&"bob".into(), &"dave".into(), Asset::sp(POWER)),
            Err(QuillError::InsufficientPower { need: POWER, have: POWER / 2 })
        );
    }

    #[test]
    fn beneficiaries_are_set_once_and_before_votes() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let options = CommentOptions {
            beneficiaries: vec![Beneficiary::new("bob", 2_500), Beneficiary::new("carol", 2_500)],
            ..CommentOptions::default()
        };
        let mut engine = StateEngine::new(&mut state, &params);
        engine.set_comment_options(&root, &options).unwrap();
        assert_eq!(engine.set_comment_options(&root, &options), Err(QuillError::BeneficiariesAlreadySet));

        engine.create_comment(&"bob".into(), "voted", None, 150).unwrap();
        let voted = CommentRef::new("bob", "voted");
        engine.apply_vote(&"carol".into(), &voted, 1_000, 200, &mut EventLog::new()).unwrap();
        assert_eq!(engine.set_comment_options(&voted, &options), Err(QuillError::BeneficiariesAfterVotes));
    }

    #[test]
    fn beneficiary_must_exist() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let options = CommentOptions {
            beneficiaries: vec![Beneficiary::new("zed", 2_500)],
            ..CommentOptions::default()
        };
        let err = StateEngine::new(&mut state, &params).set_comment_options(&root, &options).unwrap_err();
        assert_eq!(err, QuillError::UnknownAccount("zed".into()));
    }

    #[test]
    fn max_payout_only_decreases() {
        let params = params();
        let mut state = setup();
        let root = post(&mut state, &params);
        let mut engine = StateEngine::new(&mut state, &params);
        let lower = CommentOptions { max_accepted_payout: Some(1_000), ..CommentOptions::default() };
        engine.set_comment_options(&root, &lower).unwrap();
        let higher = CommentOptions { max_accepted_payout: Some(2_000), ..CommentOptions::default() };
        assert_eq!(engine.set_comment_options(&root, &higher), Err(QuillError::MaxPayoutIncrease));
    }
}
