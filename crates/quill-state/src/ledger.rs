use quill_core::types::{AccountName, Asset, Symbol};
use tracing::warn;

use crate::store::ChainState;

/// Account bookkeeping the cashout processor credits payouts through.
///
/// Staked payouts go through `create_scorumpower`, liquid payouts through
/// `increase_balance`. Both are infallible: recipients are validated when
/// the comment, vote or beneficiary list that names them is accepted.
pub trait StakeConverter {
    /// Credit a liquid amount.
    fn increase_balance(&mut self, account: &AccountName, amount: Asset);

    /// Convert `amount` (liquid or already staked) into staked power at 1:1
    /// and credit it. Returns the power created.
    fn create_scorumpower(&mut self, account: &AccountName, amount: Asset) -> Asset;
}

impl StakeConverter for ChainState {
    fn increase_balance(&mut self, account: &AccountName, amount: Asset) {
        debug_assert_eq!(amount.symbol, Symbol::Scr);
        match self.account_mut(account) {
            Ok(acc) => acc.balance = acc.balance.saturating_add(Asset::scr(amount.amount)),
            Err(e) => warn!(account = %account, amount = %amount, error = %e, "liquid payout to missing account dropped"),
        }
    }

    fn create_scorumpower(&mut self, account: &AccountName, amount: Asset) -> Asset {
        let power = Asset::sp(amount.amount);
        match self.account_mut(account) {
            Ok(acc) => {
                acc.scorumpower = acc.scorumpower.saturating_add(power);
                power
            }
            Err(e) => {
                warn!(account = %account, amount = %amount, error = %e, "staked payout to missing account dropped");
                Asset::sp(0)
            }
        }
    }
}
