use quill_core::event::{EventLog, RewardEvent};
use quill_core::params::RewardParams;
use quill_core::types::{Asset, BlockNum, Symbol};
use quill_math::percent_of;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Self-adjusting emission pool feeding one reward fund.
///
/// Each block it hands out `current_per_block_reward` (or what is left).
/// The rate drifts by `adjust_reward_percent` so that the pool keeps between
/// `guaranteed_reward_supply_days` and `reward_increase_threshold_days` worth
/// of emission in reserve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBalancer {
    pub balance: Asset,
    pub current_per_block_reward: Asset,
}

impl RewardBalancer {
    /// Pool seeded with `initial_supply`, paying it out evenly over the
    /// guaranteed supply period.
    pub fn new(initial_supply: Asset, params: &RewardParams) -> Self {
        let blocks = params.guaranteed_reward_supply_days as i64 * params.blocks_per_day() as i64;
        let per_block = (initial_supply.amount / blocks.max(1)).max(params.min_per_block_reward);
        Self {
            balance: initial_supply,
            current_per_block_reward: initial_supply.with_amount(per_block),
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.balance.symbol
    }

    /// Credit incoming emission. Returns the new balance.
    pub fn increase_balance(&mut self, delta: Asset) -> Asset {
        self.balance = self.balance.saturating_add(delta);
        self.balance
    }

    /// Run one block: adjust the rate if this is an adjustment block, then
    /// take up to one block's reward out of the pool. Never leaves the
    /// balance negative.
    pub fn take_block_reward(&mut self, block_num: BlockNum, params: &RewardParams, events: &mut EventLog) -> Asset {
        if block_num % params.adjust_interval_blocks.max(1) == 0 {
            let old = self.current_per_block_reward;
            let new = adjust_per_block_reward(self, params);
            if new != old {
                self.current_per_block_reward = new;
                info!(block_num, symbol = %self.symbol(), old = old.amount, new = new.amount, "emission rate changed");
                events.push(RewardEvent::EmissionRateChanged { block_num, old_per_block: old, new_per_block: new });
            }
        }

        let taken = self
            .balance
            .with_amount(self.balance.amount.min(self.current_per_block_reward.amount).max(0));
        self.balance = self.balance.saturating_sub(taken);
        taken
    }
}

/// The rate the balancer should pay given its current reserve.
///
/// * reserve above `D_max` days: grow by `adjust_reward_percent`
/// * reserve below `D_min` days: shrink by the same step, floored at the minimum
/// * otherwise unchanged
///
/// The step is at least `min_per_block_reward`.
pub fn adjust_per_block_reward(balancer: &RewardBalancer, params: &RewardParams) -> Asset {
    let current = balancer.current_per_block_reward.amount;
    let per_day = current as i128 * params.blocks_per_day() as i128;
    let balance = balancer.balance.amount as i128;
    let step = percent_of(current, params.adjust_reward_percent).max(params.min_per_block_reward);

    let next = if balance > per_day * params.reward_increase_threshold_days as i128 {
        current.saturating_add(step)
    } else if balance < per_day * params.guaranteed_reward_supply_days as i128 {
        current.saturating_sub(step).max(params.min_per_block_reward)
    } else {
        current
    };
    balancer.current_per_block_reward.with_amount(next)
}
