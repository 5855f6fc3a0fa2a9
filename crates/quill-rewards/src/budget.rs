use quill_core::types::{Asset, BlockNum};
use serde::{Deserialize, Serialize};

/// Fixed pot released evenly, one slice per block, over
/// `[start_block, end_block]`. Feeds the staked-power emission balancer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundBudget {
    pub balance: Asset,
    pub per_block: Asset,
    pub start_block: BlockNum,
    pub end_block: BlockNum,
}

impl FundBudget {
    pub fn new(balance: Asset, start_block: BlockNum, end_block: BlockNum) -> Self {
        let blocks = end_block.saturating_sub(start_block) + 1;
        let mut per_block = balance.amount / blocks as i64;
        if per_block == 0 && balance.amount > 0 {
            per_block = 1;
        }
        Self { balance, per_block: balance.with_amount(per_block), start_block, end_block }
    }

    pub fn is_active(&self, block_num: BlockNum) -> bool {
        (self.start_block..=self.end_block).contains(&block_num) && self.balance.amount > 0
    }

    /// Release this block's slice. The final block also releases the
    /// rounding remainder so the pot empties exactly at `end_block`.
    pub fn allocate(&mut self, block_num: BlockNum) -> Asset {
        if !self.is_active(block_num) {
            return self.balance.with_amount(0);
        }
        let slice = if block_num == self.end_block {
            self.balance
        } else {
            self.balance.min(self.per_block)
        };
        self.balance = self.balance.saturating_sub(slice);
        slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_evenly_and_empties_on_last_block() {
        let mut budget = FundBudget::new(Asset::sp(1_003), 10, 19);
        assert_eq!(budget.per_block, Asset::sp(100));
        assert_eq!(budget.allocate(9), Asset::sp(0));
        let total: i64 = (10..=19).map(|n| budget.allocate(n).amount).sum();
        assert_eq!(total, 1_003);
        assert_eq!(budget.balance, Asset::sp(0));
        assert_eq!(budget.allocate(20), Asset::sp(0));
    }

    #[test]
    fn tiny_budget_pays_one_unit_until_empty() {
        let mut budget = FundBudget::new(Asset::sp(3), 1, 10);
        let slices: Vec<i64> = (1..=10).map(|n| budget.allocate(n).amount).collect();
        assert_eq!(slices, vec![1, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
    }
}
