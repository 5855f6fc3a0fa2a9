//! quill-rewards
//!
//! Block-level reward processing: the self-balancing emission pools that
//! feed the reward funds, and the cashout that pays matured comments,
//! their curators, beneficiaries and ancestors.

pub mod balancer;
pub mod block;
pub mod budget;
pub mod cashout;
pub mod propagation;

pub use balancer::{adjust_per_block_reward, RewardBalancer};
pub use block::{BlockContext, BlockProcessor, BlockResult, RewardPools};
pub use budget::FundBudget;
pub use cashout::{liquid_part, CashoutProcessor, CashoutSummary, CommentPayout};
pub use propagation::{pending_rewards_for, LegacyAuthorWallet, PendingRewards, PerEdgeLedger};
