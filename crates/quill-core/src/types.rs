use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw token amount in the smallest indivisible unit. Signed so that
/// intermediate subtractions can be checked before they are applied.
pub type ShareType = i64;

/// Unix timestamp (seconds, UTC). Always the block's declared time.
pub type Timestamp = i64;

/// Block height.
pub type BlockNum = u64;

/// Basis points: 10_000 == 100%.
pub type Percent = u16;

/// Reward-shares contributed by a vote (signed: downvotes are negative).
pub type Rshares = i64;

/// Output of a reward curve.
pub type Claim = u128;

// ── Symbol / Asset ───────────────────────────────────────────────────────────

/// The two token denominations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    /// Liquid token.
    Scr,
    /// Staked power token.
    Sp,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Scr => write!(f, "SCR"),
            Symbol::Sp => write!(f, "SP"),
        }
    }
}

/// An amount tagged with its denomination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub amount: ShareType,
    pub symbol: Symbol,
}

impl Asset {
    pub const fn new(amount: ShareType, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub const fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    pub const fn scr(amount: ShareType) -> Self {
        Self::new(amount, Symbol::Scr)
    }

    pub const fn sp(amount: ShareType) -> Self {
        Self::new(amount, Symbol::Sp)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Same symbol, different amount.
    pub fn with_amount(&self, amount: ShareType) -> Self {
        Self::new(amount, self.symbol)
    }

    /// Sum of two amounts of the same symbol. Saturates at `i64::MAX`.
    pub fn saturating_add(self, other: Asset) -> Asset {
        debug_assert_eq!(self.symbol, other.symbol);
        self.with_amount(self.amount.saturating_add(other.amount))
    }

    /// Difference floored at zero.
    pub fn saturating_sub(self, other: Asset) -> Asset {
        debug_assert_eq!(self.symbol, other.symbol);
        self.with_amount(self.amount.saturating_sub(other.amount).max(0))
    }

    pub fn min(self, other: Asset) -> Asset {
        if other.amount < self.amount {
            self.with_amount(other.amount)
        } else {
            self
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.symbol)
    }
}

// ── AccountName ──────────────────────────────────────────────────────────────

/// Human-readable account name; ordering is byte-wise.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(pub String);

impl AccountName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for AccountName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

// ── CommentId / CommentRef ───────────────────────────────────────────────────

/// Arena index of a comment. Assigned in creation order, so it doubles as
/// the stable tie-break for cashout ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl CommentId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommentId({})", self.0)
    }
}

/// External identity of a comment: `(author, permlink)`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentRef {
    pub author: AccountName,
    pub permlink: String,
}

impl CommentRef {
    pub fn new(author: impl Into<String>, permlink: impl Into<String>) -> Self {
        Self { author: AccountName::new(author), permlink: permlink.into() }
    }
}

impl fmt::Display for CommentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}/{}", self.author, self.permlink)
    }
}

impl fmt::Debug for CommentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommentRef({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_subtraction_floors_at_zero() {
        let a = Asset::scr(5);
        assert_eq!(a.saturating_sub(Asset::scr(9)), Asset::scr(0));
        assert_eq!(a.saturating_sub(Asset::scr(2)), Asset::scr(3));
    }

    #[test]
    fn account_names_order_bytewise() {
        let mut names = vec![AccountName::from("bob"), AccountName::from("alice"), AccountName::from("Zed")];
        names.sort();
        assert_eq!(names[0].as_str(), "Zed");
        assert_eq!(names[1].as_str(), "alice");
    }

    #[test]
    fn comment_ref_display() {
        assert_eq!(CommentRef::new("alice", "post").to_string(), "@alice/post");
    }
}
