use primitive_types::U256;

use crate::curve::{saturate_u128, RewardCurve};

/// 100% in basis points.
pub const HUNDRED_PERCENT: u64 = 10_000;

const SECONDS_PER_DAY: u64 = 86_400;

// ── Voting power ─────────────────────────────────────────────────────────────

/// Voting power after regenerating linearly for `now - last_voted` seconds,
/// capped at 100%.
pub fn restoring_power(voting_power: u16, now: i64, last_voted: i64, regeneration_secs: u32) -> u16 {
    if regeneration_secs == 0 {
        return HUNDRED_PERCENT as u16;
    }
    let elapsed = now.saturating_sub(last_voted).max(0) as u64;
    let regenerated = (HUNDRED_PERCENT as u128 * elapsed as u128) / regeneration_secs as u128;
    (voting_power as u128 + regenerated).min(HUNDRED_PERCENT as u128) as u16
}

/// Voting power consumed by a vote of `weight` (signed basis points).
///
/// `ceil((power * |weight| / 100%) / denom)` where
/// `denom = max_votes_per_day_rate * regeneration_secs / 1 day`.
/// Never exceeds `power`.
pub fn used_power(power: u16, weight: i16, max_votes_per_day_rate: u32, regeneration_secs: u32) -> u16 {
    let abs_weight = weight.unsigned_abs() as u64;
    let used = power as u64 * abs_weight / HUNDRED_PERCENT;
    let denom = (max_votes_per_day_rate as u64 * regeneration_secs as u64 / SECONDS_PER_DAY).max(1);
    let used = (used + denom - 1) / denom;
    used.min(power as u64) as u16
}

/// Absolute rshares produced by spending `used_power` of `effective_stake`.
pub fn abs_reward_shares(used_power: u16, effective_stake: i64) -> i64 {
    let stake = effective_stake.max(0) as u128;
    let shares = stake * used_power as u128 / HUNDRED_PERCENT as u128;
    shares.min(i64::MAX as u128) as i64
}

// ── Claims ───────────────────────────────────────────────────────────────────

/// `recent_claims - recent_claims * elapsed / decay_secs`, floored at zero.
pub fn decay_recent_claims(recent_claims: u128, elapsed_secs: i64, decay_secs: u32) -> u128 {
    if decay_secs == 0 || elapsed_secs <= 0 {
        return recent_claims;
    }
    let elapsed = U256::from(elapsed_secs as u64);
    let shrink = U256::from(recent_claims).saturating_mul(elapsed) / U256::from(decay_secs);
    saturate_u128(U256::from(recent_claims).saturating_sub(shrink))
}

/// Share of `fund_balance` earned by `claim` out of `total_claims`.
///
/// Zero when either claim side is zero. Payouts below `min_share` are
/// dropped, the rest are capped at `max_share`.
pub fn calculate_payout(claim: u128, total_claims: u128, fund_balance: i64, max_share: i64, min_share: i64) -> i64 {
    if claim == 0 || total_claims == 0 || fund_balance <= 0 {
        return 0;
    }
    let payout = U256::from(fund_balance as u64).saturating_mul(U256::from(claim)) / U256::from(total_claims);
    let payout = if payout > U256::from(fund_balance as u64) {
        fund_balance
    } else {
        payout.as_u64() as i64
    };
    if payout < min_share {
        return 0;
    }
    payout.min(max_share.max(0))
}

// ── Percentages ──────────────────────────────────────────────────────────────

/// `amount * percent / 100%`, floored. Negative amounts yield zero.
pub fn percent_of(amount: i64, percent: u16) -> i64 {
    if amount <= 0 {
        return 0;
    }
    (amount as u128 * percent as u128 / HUNDRED_PERCENT as u128) as i64
}

/// Curators' total cut of a payout.
pub fn curations_payout(payout: i64, curation_percent: u16) -> i64 {
    percent_of(payout, curation_percent)
}

/// One curator's cut: `curations * weight / total_weight`.
pub fn curation_payout(curations: i64, total_weight: u64, weight: u64) -> i64 {
    if total_weight == 0 || curations <= 0 {
        return 0;
    }
    (weight as u128 * curations as u128 / total_weight as u128) as i64
}

// ── Curation weight ──────────────────────────────────────────────────────────

/// Increase of the curation curve caused by raising the comment's positive
/// rshares from `old_rshares` to `new_rshares`.
pub fn max_vote_weight(new_rshares: i64, old_rshares: i64, curation_curve: RewardCurve) -> u64 {
    let new_weight = to_u64(curation_curve.evaluate(new_rshares));
    let old_weight = to_u64(curation_curve.evaluate(old_rshares));
    new_weight.saturating_sub(old_weight)
}

/// Reverse auction: scales `max_weight` by how far into the window the vote
/// landed, `max_weight * min(now - created, window) / window`.
pub fn reverse_auction_weight(max_weight: u64, now: i64, created: i64, window_secs: u32) -> u64 {
    if window_secs == 0 {
        return max_weight;
    }
    let delta = (now.saturating_sub(created).max(0) as u64).min(window_secs as u64);
    (max_weight as u128 * delta as u128 / window_secs as u128) as u64
}

fn to_u64(x: u128) -> u64 {
    x.min(u64::MAX as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGEN: u32 = 5 * 86_400;

    #[test]
    fn power_regenerates_linearly_and_caps() {
        assert_eq!(restoring_power(5_000, 100, 100, REGEN), 5_000);
        // Half the window restores 50%.
        assert_eq!(restoring_power(0, REGEN as i64 / 2, 0, REGEN), 5_000);
        assert_eq!(restoring_power(9_000, 10 * REGEN as i64, 0, REGEN), 10_000);
    }

    #[test]
    fn full_vote_uses_one_fiftieth_of_power() {
        // denom = 10 * 5 days / 1 day = 50
        assert_eq!(used_power(10_000, 10_000, 10, REGEN), 200);
        assert_eq!(used_power(10_000, -10_000, 10, REGEN), 200);
        // 1% vote: 100 / 50 = 2
        assert_eq!(used_power(10_000, 100, 10, REGEN), 2);
        // Rounds up.
        assert_eq!(used_power(10_000, 1, 10, REGEN), 1);
        assert_eq!(used_power(10_000, 0, 10, REGEN), 0);
    }

    #[test]
    fn used_power_never_exceeds_available() {
        assert_eq!(used_power(1, 10_000, 1, 86_400), 1);
        assert_eq!(used_power(0, 10_000, 10, REGEN), 0);
    }

    #[test]
    fn abs_shares_scale_with_used_power() {
        assert_eq!(abs_reward_shares(200, 1_000_000_000), 20_000_000);
        assert_eq!(abs_reward_shares(0, 1_000_000_000), 0);
        assert_eq!(abs_reward_shares(10_000, -5), 0);
    }

    #[test]
    fn claims_decay_proportionally_to_elapsed_time() {
        let decay = 15 * 86_400;
        assert_eq!(decay_recent_claims(1_000_000, 0, decay), 1_000_000);
        assert_eq!(decay_recent_claims(1_000_000, decay as i64 / 2, decay), 500_000);
        assert_eq!(decay_recent_claims(1_000_000, decay as i64, decay), 0);
        assert_eq!(decay_recent_claims(1_000_000, 10 * decay as i64, decay), 0);
    }

    #[test]
    fn payout_is_zero_for_empty_claims() {
        assert_eq!(calculate_payout(0, 100, 1_000, i64::MAX, 1), 0);
        assert_eq!(calculate_payout(10, 0, 1_000, i64::MAX, 1), 0);
    }

    #[test]
    fn payout_respects_min_and_max() {
        assert_eq!(calculate_payout(1, 3, 1_000, i64::MAX, 1), 333);
        assert_eq!(calculate_payout(1, 3, 1_000, 100, 1), 100);
        assert_eq!(calculate_payout(1, 3, 1_000, i64::MAX, 334), 0);
    }

    #[test]
    fn payout_survives_huge_claims() {
        let claim = u128::MAX / 2;
        assert_eq!(calculate_payout(claim, u128::MAX, 1_000_000, i64::MAX, 1), 499_999);
    }

    #[test]
    fn curation_split() {
        assert_eq!(curations_payout(120, 2_500), 30);
        assert_eq!(curation_payout(30, 5_000, 2_500), 15);
        assert_eq!(curation_payout(30, 0, 2_500), 0);
    }

    #[test]
    fn reverse_auction_discounts_early_votes() {
        let window = 1_800;
        assert_eq!(reverse_auction_weight(1_000, 0, 0, window), 0);
        assert_eq!(reverse_auction_weight(1_000, 900, 0, window), 500);
        assert_eq!(reverse_auction_weight(1_000, 1_800, 0, window), 1_000);
        assert_eq!(reverse_auction_weight(1_000, 9_000, 0, window), 1_000);
    }

    #[test]
    fn max_vote_weight_is_curve_delta() {
        assert_eq!(max_vote_weight(300, 100, RewardCurve::Linear), 200);
        assert_eq!(max_vote_weight(100, 300, RewardCurve::Linear), 0);
    }

    proptest::proptest! {
        #[test]
        fn decay_never_grows(claims in 0u128..u128::MAX / 4, dt in 0i64..10_000_000) {
            proptest::prop_assert!(decay_recent_claims(claims, dt, 1_296_000) <= claims);
        }

        #[test]
        fn payout_never_exceeds_fund(balance in 0i64..i64::MAX / 2, claim in 1u128..1u128 << 100, extra in 0u128..1u128 << 100) {
            let payout = calculate_payout(claim, claim + extra, balance, i64::MAX, 1);
            proptest::prop_assert!(payout <= balance);
        }
    }
}
