use serde::{Deserialize, Serialize};

use crate::comment::CommentOptions;
use crate::types::{AccountName, Asset, CommentRef};

/// Every state-changing user operation the reward engine evaluates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    // ── Content ──────────────────────────────────────────────────────────────

    /// Publish a post (no parent) or a reply.
    Comment {
        author: AccountName,
        permlink: String,
        #[serde(default)]
        parent: Option<CommentRef>,
    },

    /// Adjust payout options before the first vote.
    CommentOptions {
        author: AccountName,
        permlink: String,
        options: CommentOptions,
    },

    // ── Voting ───────────────────────────────────────────────────────────────

    /// Cast, change or remove (`weight == 0`) a vote.
    Vote {
        voter: AccountName,
        author: AccountName,
        permlink: String,
        /// Signed basis points, -10000..=10000.
        weight: i16,
    },

    // ── Stake ────────────────────────────────────────────────────────────────

    /// Set the amount of power lent to `delegatee`; zero removes it.
    DelegateScorumpower {
        delegator: AccountName,
        delegatee: AccountName,
        scorumpower: Asset,
    },
}
