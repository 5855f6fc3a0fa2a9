use std::collections::{BTreeMap, BTreeSet};

use quill_core::account::{Account, Delegation};
use quill_core::comment::{Comment, CommentVote};
use quill_core::error::QuillError;
use quill_core::types::{AccountName, CommentId, CommentRef, Timestamp};

/// In-memory chain state the reward engine reads and mutates.
///
/// Comments live in an arena indexed by `CommentId` (creation order);
/// `(author, permlink)` and `(cashout_time, id)` are secondary indices.
/// Parent links are plain ids, so ancestor walks are iterative.
#[derive(Clone, Debug, Default)]
pub struct ChainState {
    accounts: BTreeMap<AccountName, Account>,
    comments: Vec<Comment>,
    by_permlink: BTreeMap<CommentRef, CommentId>,
    by_cashout: BTreeSet<(Timestamp, CommentId)>,
    votes: BTreeMap<(CommentId, AccountName), CommentVote>,
    delegations: BTreeMap<(AccountName, AccountName), Delegation>,
}

impl ChainState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accounts ─────────────────────────────────────────────────────────────

    pub fn create_account(&mut self, account: Account) -> Result<(), QuillError> {
        if self.accounts.contains_key(&account.name) {
            return Err(QuillError::DuplicateAccount(account.name.to_string()));
        }
        self.accounts.insert(account.name.clone(), account);
        Ok(())
    }

    pub fn account(&self, name: &AccountName) -> Result<&Account, QuillError> {
        self.accounts
            .get(name)
            .ok_or_else(|| QuillError::UnknownAccount(name.to_string()))
    }

    pub fn account_mut(&mut self, name: &AccountName) -> Result<&mut Account, QuillError> {
        self.accounts
            .get_mut(name)
            .ok_or_else(|| QuillError::UnknownAccount(name.to_string()))
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    // ── Comments ─────────────────────────────────────────────────────────────

    /// Allocates the next arena id. The caller must insert a comment with it.
    pub fn next_comment_id(&self) -> CommentId {
        CommentId(self.comments.len() as u64)
    }

    pub fn insert_comment(&mut self, comment: Comment) -> Result<CommentId, QuillError> {
        let id = comment.id;
        if id != self.next_comment_id() {
            return Err(QuillError::Other(format!("comment id {id} out of sequence")));
        }
        let key = comment.comment_ref();
        if self.by_permlink.contains_key(&key) {
            return Err(QuillError::DuplicateComment(key.to_string()));
        }
        self.by_permlink.insert(key, id);
        self.by_cashout.insert((comment.cashout_time, id));
        self.comments.push(comment);
        Ok(id)
    }

    pub fn comment(&self, id: CommentId) -> Result<&Comment, QuillError> {
        self.comments
            .get(id.index())
            .ok_or_else(|| QuillError::UnknownComment(id.to_string()))
    }

    /// Mutable access. `cashout_time` must only change through
    /// [`ChainState::set_cashout_time`] to keep the cashout index in sync.
    pub fn comment_mut(&mut self, id: CommentId) -> Result<&mut Comment, QuillError> {
        self.comments
            .get_mut(id.index())
            .ok_or_else(|| QuillError::UnknownComment(id.to_string()))
    }

    pub fn find_comment(&self, key: &CommentRef) -> Result<CommentId, QuillError> {
        self.by_permlink
            .get(key)
            .copied()
            .ok_or_else(|| QuillError::UnknownComment(key.to_string()))
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn set_cashout_time(&mut self, id: CommentId, cashout_time: Timestamp) -> Result<(), QuillError> {
        let comment = self
            .comments
            .get_mut(id.index())
            .ok_or_else(|| QuillError::UnknownComment(id.to_string()))?;
        self.by_cashout.remove(&(comment.cashout_time, id));
        comment.cashout_time = cashout_time;
        self.by_cashout.insert((cashout_time, id));
        Ok(())
    }

    /// Comments with `cashout_time <= now`, ordered by `(cashout_time, id)`.
    pub fn comments_due(&self, now: Timestamp) -> Vec<CommentId> {
        self.by_cashout
            .range(..=(now, CommentId(u64::MAX)))
            .map(|(_, id)| *id)
            .collect()
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: CommentId) -> Ancestors<'_> {
        let next = self.comments.get(id.index()).and_then(|c| c.parent);
        Ancestors { state: self, next }
    }

    // ── Votes ────────────────────────────────────────────────────────────────

    pub fn vote(&self, comment: CommentId, voter: &AccountName) -> Option<&CommentVote> {
        self.votes.get(&(comment, voter.clone()))
    }

    pub fn put_vote(&mut self, vote: CommentVote) {
        self.votes.insert((vote.comment, vote.voter.clone()), vote);
    }

    /// Every vote on `comment`, ordered by voter name.
    pub fn votes_for(&self, comment: CommentId) -> impl Iterator<Item = &CommentVote> {
        self.votes
            .range((comment, AccountName::new(""))..)
            .take_while(move |((id, _), _)| *id == comment)
            .map(|(_, v)| v)
    }

    pub fn all_votes(&self) -> impl Iterator<Item = &CommentVote> {
        self.votes.values()
    }

    // ── Delegations ──────────────────────────────────────────────────────────

    pub fn delegation(&self, delegator: &AccountName, delegatee: &AccountName) -> Option<&Delegation> {
        self.delegations.get(&(delegator.clone(), delegatee.clone()))
    }

    pub fn put_delegation(&mut self, delegation: Delegation) {
        let key = (delegation.delegator.clone(), delegation.delegatee.clone());
        if delegation.scorumpower.is_zero() {
            self.delegations.remove(&key);
        } else {
            self.delegations.insert(key, delegation);
        }
    }

    pub fn delegations(&self) -> impl Iterator<Item = &Delegation> {
        self.delegations.values()
    }
}

/// Iterative parent-pointer walk; see [`ChainState::ancestors`].
pub struct Ancestors<'a> {
    state: &'a ChainState,
    next: Option<CommentId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Comment;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let comment = self.state.comments.get(id.index())?;
        self.next = comment.parent;
        Some(comment)
    }
}
