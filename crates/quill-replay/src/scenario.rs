use std::path::Path;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use quill_core::account::Account;
use quill_core::error::QuillError;
use quill_core::operation::Operation;
use quill_core::params::RewardParams;
use quill_core::types::{AccountName, Asset, BlockNum, Timestamp};
use quill_rewards::{FundBudget, RewardPools};
use quill_state::ChainState;

/// A replayable chain history: policy, starting balances and blocks of
/// operations.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub params: RewardParams,
    pub genesis: Genesis,
    #[serde(default)]
    pub blocks: Vec<ScenarioBlock>,
}

#[derive(Debug, Deserialize)]
pub struct Genesis {
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    /// Initial reserve of the liquid-token balancer.
    #[serde(default)]
    pub scr_reward_supply: i64,
    /// Initial reserve of the staked-power balancer.
    #[serde(default)]
    pub sp_reward_supply: i64,
    #[serde(default)]
    pub budget: Option<GenesisBudget>,
}

#[derive(Debug, Deserialize)]
pub struct GenesisAccount {
    pub name: AccountName,
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub scorumpower: i64,
}

#[derive(Debug, Deserialize)]
pub struct GenesisBudget {
    pub balance: i64,
    pub start_block: BlockNum,
    pub end_block: BlockNum,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioBlock {
    pub num: BlockNum,
    pub time: DateTime<Utc>,
    /// Liquid-token revenue collected in this block.
    #[serde(default)]
    pub revenue: i64,
    #[serde(default)]
    pub ops: Vec<Operation>,
}

impl ScenarioBlock {
    pub fn timestamp(&self) -> Timestamp {
        self.time.timestamp()
    }
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario from {}", path.display()))?;
        let scenario: Scenario = serde_json::from_str(&json).context("parsing scenario JSON")?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Params must be valid and blocks strictly ascending in number and
    /// non-decreasing in time, starting no earlier than genesis.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.params.validate().context("invalid params")?;
        let mut prev_num = 0;
        let mut prev_time = self.genesis.time;
        for block in &self.blocks {
            if block.num <= prev_num {
                bail!("block {} does not follow block {}", block.num, prev_num);
            }
            if block.time < prev_time {
                bail!("block {} goes back in time ({})", block.num, block.time);
            }
            if block.revenue < 0 {
                bail!("block {} has negative revenue", block.num);
            }
            prev_num = block.num;
            prev_time = block.time;
        }
        Ok(())
    }

    /// Fresh state and reward pools as of genesis.
    pub fn build_genesis(&self) -> Result<(ChainState, RewardPools), QuillError> {
        let now = self.genesis.time.timestamp();
        let mut state = ChainState::new();
        for entry in &self.genesis.accounts {
            if entry.balance < 0 || entry.scorumpower < 0 {
                return Err(QuillError::NegativeAsset);
            }
            let mut account = Account::new(entry.name.clone(), now);
            account.balance = Asset::scr(entry.balance);
            account.scorumpower = Asset::sp(entry.scorumpower);
            state.create_account(account)?;
        }

        let budget = self
            .genesis
            .budget
            .as_ref()
            .map(|b| FundBudget::new(Asset::sp(b.balance), b.start_block, b.end_block));
        let pools = RewardPools::genesis(
            Asset::scr(self.genesis.scr_reward_supply),
            Asset::sp(self.genesis.sp_reward_supply),
            budget,
            now,
            &self.params,
        );
        Ok((state, pools))
    }
}
