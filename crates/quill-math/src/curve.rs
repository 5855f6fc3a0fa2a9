use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Maps accumulated rshares to a claim weight.
///
/// The set of curves is fixed by consensus, so this is a closed enum that
/// every caller must match exhaustively. Evaluation runs on 256-bit
/// integers and saturates to `u128`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCurve {
    /// `r`
    #[default]
    Linear,
    /// `(r + s)^2 - s^2`
    Quadratic { s: u64 },
    /// `floor(sqrt(r))`
    SquareRoot,
    /// `r * floor(sqrt(r))`
    Power1Dot5,
    /// `((r + s)^2 - s^2) / (r + 4s)`, tends to linear for large `r`.
    ConvergentLinear { s: u64 },
}

impl RewardCurve {
    /// Claim weight for `rshares`. Non-positive input yields zero.
    pub fn evaluate(&self, rshares: i64) -> u128 {
        if rshares <= 0 {
            return 0;
        }
        self.evaluate_unsigned(rshares as u128)
    }

    pub fn evaluate_unsigned(&self, rshares: u128) -> u128 {
        let r = U256::from(rshares);
        let claim = match *self {
            RewardCurve::Linear => r,
            RewardCurve::Quadratic { s } => quadratic(r, U256::from(s)),
            RewardCurve::SquareRoot => r.integer_sqrt(),
            RewardCurve::Power1Dot5 => r.saturating_mul(r.integer_sqrt()),
            RewardCurve::ConvergentLinear { s } => {
                let s = U256::from(s);
                let denom = r.saturating_add(s.saturating_mul(U256::from(4u8)));
                if denom.is_zero() {
                    U256::zero()
                } else {
                    quadratic(r, s) / denom
                }
            }
        };
        saturate_u128(claim)
    }
}

/// `(r + s)^2 - s^2`, computed as `r * (r + 2s)` to stay in range longer.
fn quadratic(r: U256, s: U256) -> U256 {
    let two_s = s.saturating_mul(U256::from(2u8));
    r.saturating_mul(r.saturating_add(two_s))
}

pub(crate) fn saturate_u128(x: U256) -> u128 {
    if x > U256::from(u128::MAX) {
        u128::MAX
    } else {
        x.as_u128()
    }
}
