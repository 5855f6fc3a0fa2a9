use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuillError {
    // ── Lookup errors ────────────────────────────────────────────────────────
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("account already exists: {0}")]
    DuplicateAccount(String),

    #[error("unknown comment: {0}")]
    UnknownComment(String),

    #[error("comment already exists: {0}")]
    DuplicateComment(String),

    #[error("unknown parent comment: {0}")]
    UnknownParent(String),

    // ── Comment errors ───────────────────────────────────────────────────────
    #[error("comment depth {depth} exceeds maximum {max}")]
    CommentTooDeep { depth: u16, max: u16 },

    #[error("invalid permlink: {0}")]
    InvalidPermlink(String),

    #[error("comment options can only be changed before the first vote")]
    OptionsAfterVotes,

    #[error("max accepted payout can only be lowered")]
    MaxPayoutIncrease,

    #[error("votes and curation rewards can only be disabled, not re-enabled")]
    FlagReenabled,

    // ── Beneficiary errors ───────────────────────────────────────────────────
    #[error("beneficiary list is empty")]
    EmptyBeneficiaries,

    #[error("too many beneficiaries: max {max}, got {got}")]
    TooManyBeneficiaries { max: usize, got: usize },

    #[error("beneficiary {account} weight {weight} exceeds 100%")]
    BeneficiaryWeightTooLarge { account: String, weight: u16 },

    #[error("beneficiary weights sum to {sum}, above 100%")]
    BeneficiariesSumExceeded { sum: u32 },

    #[error("beneficiaries must be sorted by account name and unique")]
    BeneficiariesNotSorted,

    #[error("beneficiaries already set")]
    BeneficiariesAlreadySet,

    #[error("beneficiaries can only be set before the first vote")]
    BeneficiariesAfterVotes,

    // ── Vote errors ──────────────────────────────────────────────────────────
    #[error("vote weight {0} outside [-10000, 10000]")]
    InvalidVoteWeight(i32),

    #[error("zero-weight vote with no existing vote to remove")]
    ZeroWeightWithoutVote,

    #[error("comment is archived and no longer accepts votes")]
    VoteOnArchivedComment,

    #[error("votes are disabled for this comment")]
    VotesDisabled,

    #[error("can only vote once every {min_secs} seconds")]
    VoteTooFrequent { min_secs: u32 },

    #[error("account has no voting power left")]
    NoVotingPower,

    #[error("voting weight is too small, rshares {rshares} at or below dust threshold")]
    DustVote { rshares: i64 },

    #[error("cannot increase payout within the last {lockout_secs} seconds before payout")]
    UpvoteLockout { lockout_secs: u32 },

    #[error("voter has changed this vote too many times (max {max})")]
    TooManyVoteChanges { max: u16 },

    #[error("vote has not changed")]
    UnchangedVote,

    // ── Account errors ───────────────────────────────────────────────────────
    #[error("insufficient scorumpower: need {need}, have {have}")]
    InsufficientPower { need: i64, have: i64 },

    #[error("percent {0} outside [0, 10000]")]
    InvalidPercent(u16),

    #[error("amount must not be negative")]
    NegativeAsset,

    // ── Configuration ────────────────────────────────────────────────────────
    #[error("invalid reward params: {0}")]
    InvalidParams(String),

    // ── Storage ──────────────────────────────────────────────────────────────
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}
