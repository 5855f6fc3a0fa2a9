//! Integer reward math shared by vote accounting, the emission balancer and
//! the cashout processor. No floating point anywhere: every result must be
//! bit-identical across nodes.

pub mod curve;
pub mod formulas;

pub use curve::RewardCurve;
pub use formulas::*;
