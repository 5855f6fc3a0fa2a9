pub mod db;
pub mod engine;
pub mod ledger;
pub mod store;

pub use db::StateDb;
pub use engine::StateEngine;
pub use ledger::StakeConverter;
pub use store::ChainState;
