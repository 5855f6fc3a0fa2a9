//! ─── Quill Reward Constants ─────────────────────────────────────────────────
//!
//! Defaults for the live network. Every value here is only a default for
//! `RewardParams`; operations read the params handed to them, never these.

use crate::types::{Percent, Timestamp};

// ── Percentages ──────────────────────────────────────────────────────────────

/// 100% in basis points.
pub const ONE_HUNDRED_PERCENT: Percent = 10_000;

/// 1% in basis points.
pub const ONE_PERCENT: Percent = 100;

// ── Time ─────────────────────────────────────────────────────────────────────

/// Sentinel cashout time of an archived comment.
pub const TIME_NEVER: Timestamp = i64::MAX;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds between blocks.
pub const BLOCK_INTERVAL_SECS: u32 = 3;

/// Time from creation to payout.
pub const CASHOUT_WINDOW_SECS: u32 = 7 * 86_400;

/// Upvotes that increase rshares are refused this close to payout.
pub const UPVOTE_LOCKOUT_SECS: u32 = 12 * 3_600;

/// Votes inside this window after creation earn reduced curation weight.
pub const REVERSE_AUCTION_WINDOW_SECS: u32 = 30 * 60;

/// Time for voting power to recover from 0% to 100%.
pub const VOTE_REGENERATION_SECS: u32 = 5 * 86_400;

/// Full-strength votes per day that keep voting power stable.
pub const MAX_VOTES_PER_DAY_VOTING_POWER_RATE: u32 = 10;

pub const MIN_VOTE_INTERVAL_SECS: u32 = 3;

pub const MAX_VOTE_CHANGES: u16 = 5;

/// Votes whose absolute rshares do not exceed this are refused.
pub const VOTE_DUST_THRESHOLD: i64 = 50_000_000;

/// Window over which `recent_claims` decays to zero.
pub const RECENT_CLAIMS_DECAY_SECS: u32 = 15 * 86_400;

// ── Payout split ─────────────────────────────────────────────────────────────

pub const CURATION_REWARD_PERCENT: Percent = 25 * ONE_PERCENT;

/// Share of a reply's author reward forwarded to its parent.
pub const PARENT_COMMENT_REWARD_PERCENT: Percent = 50 * ONE_PERCENT;

/// Payouts below this many units are dropped.
pub const MIN_COMMENT_PAYOUT_SHARE: i64 = 1;

pub const MAX_COMMENT_DEPTH: u16 = 0xffff;

pub const MAX_COMMENT_BENEFICIARIES: usize = 127;

pub const MAX_PERMLINK_LENGTH: usize = 256;

// ── Emission ─────────────────────────────────────────────────────────────────

/// Days of supply the balancer must keep in reserve before it cuts emission.
pub const GUARANTEED_REWARD_SUPPLY_DAYS: u32 = 30;

/// Days of supply above which the balancer raises emission.
pub const REWARD_INCREASE_THRESHOLD_DAYS: u32 = 100;

/// Step size of each emission adjustment.
pub const ADJUST_REWARD_PERCENT: Percent = 5 * ONE_PERCENT;

/// Emission floor in units per block.
pub const MIN_PER_BLOCK_REWARD: i64 = 1;
