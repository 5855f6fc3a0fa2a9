use quill_core::account::{Account, Delegation};
use quill_core::comment::{Comment, CommentVote};
use quill_core::error::QuillError;
use quill_core::fund::RewardFund;
use quill_core::types::{AccountName, CommentId, Symbol};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::store::ChainState;

/// Persistent snapshot store backed by sled (pure-Rust, no C dependencies).
///
/// Named trees:
///   accounts     : name bytes                  → bincode(Account)
///   comments     : id (u64 BE)                 → bincode(Comment)
///   votes        : id (u64 BE) ++ voter bytes  → bincode(CommentVote)
///   delegations  : delegator 0x00 delegatee    → bincode(Delegation)
///   funds        : "fund/scr", "fund/sp", ... → bincode(record)
///   meta         : utf8 key bytes              → raw bytes
pub struct StateDb {
    _db: sled::Db,
    accounts: sled::Tree,
    comments: sled::Tree,
    votes: sled::Tree,
    delegations: sled::Tree,
    funds: sled::Tree,
    meta: sled::Tree,
}

fn storage(e: sled::Error) -> QuillError {
    QuillError::Storage(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, QuillError> {
    bincode::serialize(value).map_err(|e| QuillError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, QuillError> {
    bincode::deserialize(bytes).map_err(|e| QuillError::Serialization(e.to_string()))
}

fn symbol_key(prefix: &str, symbol: Symbol) -> String {
    match symbol {
        Symbol::Scr => format!("{prefix}/scr"),
        Symbol::Sp => format!("{prefix}/sp"),
    }
}

impl StateDb {
    /// Open or create the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, QuillError> {
        Self::from_db(sled::open(path).map_err(storage)?)
    }

    /// In-memory database removed on drop.
    pub fn open_temporary() -> Result<Self, QuillError> {
        Self::from_db(sled::Config::new().temporary(true).open().map_err(storage)?)
    }

    fn from_db(db: sled::Db) -> Result<Self, QuillError> {
        let accounts    = db.open_tree("accounts").map_err(storage)?;
        let comments    = db.open_tree("comments").map_err(storage)?;
        let votes       = db.open_tree("votes").map_err(storage)?;
        let delegations = db.open_tree("delegations").map_err(storage)?;
        let funds       = db.open_tree("funds").map_err(storage)?;
        let meta        = db.open_tree("meta").map_err(storage)?;
        Ok(Self { _db: db, accounts, comments, votes, delegations, funds, meta })
    }

    fn get<T: DeserializeOwned>(tree: &sled::Tree, key: &[u8]) -> Result<Option<T>, QuillError> {
        match tree.get(key).map_err(storage)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(tree: &sled::Tree, key: &[u8], value: &T) -> Result<(), QuillError> {
        tree.insert(key, encode(value)?).map_err(storage)?;
        Ok(())
    }

    fn all<T: DeserializeOwned>(tree: &sled::Tree) -> Result<Vec<T>, QuillError> {
        let mut out = Vec::new();
        for item in tree.iter() {
            let (_, bytes) = item.map_err(storage)?;
            out.push(decode(&bytes)?);
        }
        Ok(out)
    }

    // ── Accounts ─────────────────────────────────────────────────────────────

    pub fn get_account(&self, name: &AccountName) -> Result<Option<Account>, QuillError> {
        Self::get(&self.accounts, name.as_str().as_bytes())
    }

    pub fn put_account(&self, account: &Account) -> Result<(), QuillError> {
        Self::put(&self.accounts, account.name.as_str().as_bytes(), account)
    }

    // ── Comments ─────────────────────────────────────────────────────────────

    pub fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, QuillError> {
        Self::get(&self.comments, &id.0.to_be_bytes())
    }

    pub fn put_comment(&self, comment: &Comment) -> Result<(), QuillError> {
        Self::put(&self.comments, &comment.id.0.to_be_bytes(), comment)
    }

    // ── Votes ────────────────────────────────────────────────────────────────

    fn vote_key(comment: CommentId, voter: &AccountName) -> Vec<u8> {
        let mut key = comment.0.to_be_bytes().to_vec();
        key.extend_from_slice(voter.as_str().as_bytes());
        key
    }

    pub fn get_vote(&self, comment: CommentId, voter: &AccountName) -> Result<Option<CommentVote>, QuillError> {
        Self::get(&self.votes, &Self::vote_key(comment, voter))
    }

    pub fn put_vote(&self, vote: &CommentVote) -> Result<(), QuillError> {
        Self::put(&self.votes, &Self::vote_key(vote.comment, &vote.voter), vote)
    }

    // ── Delegations ──────────────────────────────────────────────────────────

    pub fn put_delegation(&self, delegation: &Delegation) -> Result<(), QuillError> {
        let mut key = delegation.delegator.as_str().as_bytes().to_vec();
        key.push(0);
        key.extend_from_slice(delegation.delegatee.as_str().as_bytes());
        Self::put(&self.delegations, &key, delegation)
    }

    // ── Funds ────────────────────────────────────────────────────────────────

    pub fn get_fund(&self, symbol: Symbol) -> Result<Option<RewardFund>, QuillError> {
        Self::get(&self.funds, symbol_key("fund", symbol).as_bytes())
    }

    pub fn put_fund(&self, fund: &RewardFund) -> Result<(), QuillError> {
        Self::put(&self.funds, symbol_key("fund", fund.symbol()).as_bytes(), fund)
    }

    /// Any other emission record (balancers, budgets), keyed by name.
    pub fn get_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, QuillError> {
        Self::get(&self.funds, key.as_bytes())
    }

    pub fn put_record<T: Serialize>(&self, key: &str, value: &T) -> Result<(), QuillError> {
        Self::put(&self.funds, key.as_bytes(), value)
    }

    // ── Snapshot ─────────────────────────────────────────────────────────────

    /// Write every account, comment, vote and delegation of `state`.
    pub fn save_state(&self, state: &ChainState) -> Result<(), QuillError> {
        for account in state.accounts() {
            self.put_account(account)?;
        }
        for comment in state.comments() {
            self.put_comment(comment)?;
        }
        for vote in state.all_votes() {
            self.put_vote(vote)?;
        }
        self.delegations.clear().map_err(storage)?;
        for delegation in state.delegations() {
            self.put_delegation(delegation)?;
        }
        Ok(())
    }

    /// Rebuild a `ChainState` (including its indices) from the stored records.
    pub fn load_state(&self) -> Result<ChainState, QuillError> {
        let mut state = ChainState::new();
        for account in Self::all::<Account>(&self.accounts)? {
            state.create_account(account)?;
        }
        // Big-endian keys iterate in id order, which insert_comment requires.
        for comment in Self::all::<Comment>(&self.comments)? {
            state.insert_comment(comment)?;
        }
        for vote in Self::all::<CommentVote>(&self.votes)? {
            state.put_vote(vote);
        }
        for delegation in Self::all::<Delegation>(&self.delegations)? {
            state.put_delegation(delegation);
        }
        Ok(state)
    }

    // ── Meta ─────────────────────────────────────────────────────────────────

    pub fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), QuillError> {
        self.meta.insert(key.as_bytes(), value).map_err(storage)?;
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, QuillError> {
        self.meta
            .get(key.as_bytes())
            .map(|v| v.map(|iv| iv.to_vec()))
            .map_err(storage)
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), QuillError> {
        self._db.flush().map_err(storage)?;
        Ok(())
    }
}
