use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};

use quill_core::event::{EventLog, RewardEvent};
use quill_core::types::{AccountName, Asset, BlockNum};
use quill_rewards::{BlockContext, BlockProcessor, RewardPools};
use quill_state::{ChainState, StateDb, StateEngine};

use crate::scenario::Scenario;

const POOLS_KEY: &str = "pools";
const LAST_BLOCK_KEY: &str = "last_block";

#[derive(Serialize)]
struct EventLine<'a> {
    block: BlockNum,
    #[serde(flatten)]
    event: &'a RewardEvent,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub name: AccountName,
    pub balance: Asset,
    pub scorumpower: Asset,
    pub posting_rewards_scr: Asset,
    pub posting_rewards_sp: Asset,
    pub curation_rewards_scr: Asset,
    pub curation_rewards_sp: Asset,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub last_block: BlockNum,
    pub blocks_applied: usize,
    pub ops_rejected: usize,
    pub cashouts: usize,
    pub paid_scr: i64,
    pub paid_sp: i64,
    pub scr_fund: Asset,
    pub sp_fund: Asset,
    pub accounts: Vec<AccountSummary>,
}

/// Replays `scenario`, writing one JSON line per event to `out`.
///
/// With a database, state resumes from its last stored block (blocks at or
/// below it are skipped) and the final state is written back.
pub fn run<W: Write>(scenario: &Scenario, db: Option<&StateDb>, out: &mut W, pretty: bool) -> anyhow::Result<Summary> {
    let (mut state, mut pools, resume_after) = match db.map(load_checkpoint).transpose()?.flatten() {
        Some((state, pools, last)) => {
            info!(last_block = last, "resuming from stored state");
            (state, pools, last)
        }
        None => {
            let (state, pools) = scenario.build_genesis().context("building genesis state")?;
            (state, pools, 0)
        }
    };

    let processor = BlockProcessor::new(&scenario.params);
    let mut summary = Summary {
        last_block: resume_after,
        blocks_applied: 0,
        ops_rejected: 0,
        cashouts: 0,
        paid_scr: 0,
        paid_sp: 0,
        scr_fund: pools.scr_fund.balance,
        sp_fund: pools.sp_fund.balance,
        accounts: Vec::new(),
    };

    for block in scenario.blocks.iter().filter(|b| b.num > resume_after) {
        let now = block.timestamp();
        let mut events = EventLog::new();
        {
            let mut engine = StateEngine::new(&mut state, &scenario.params);
            for op in &block.ops {
                if let Err(e) = engine.apply(op, now, &mut events) {
                    warn!(block = block.num, error = %e, ?op, "operation rejected");
                    summary.ops_rejected += 1;
                }
            }
        }

        let ctx = BlockContext { block_num: block.num, now, revenue: Asset::scr(block.revenue) };
        let result = processor
            .apply_block(&mut state, &mut pools, ctx, events)
            .with_context(|| format!("processing block {}", block.num))?;

        for event in &result.events {
            write_json(out, &EventLine { block: block.num, event }, pretty)?;
        }
        summary.last_block = block.num;
        summary.blocks_applied += 1;
        summary.cashouts += result.cashouts;
        summary.paid_scr += result.paid_scr;
        summary.paid_sp += result.paid_sp;
    }

    if let Some(db) = db {
        save_checkpoint(db, &state, &pools, summary.last_block)?;
    }

    summary.scr_fund = pools.scr_fund.balance;
    summary.sp_fund = pools.sp_fund.balance;
    summary.accounts = state
        .accounts()
        .map(|a| AccountSummary {
            name: a.name.clone(),
            balance: a.balance,
            scorumpower: a.scorumpower,
            posting_rewards_scr: a.posting_rewards_scr,
            posting_rewards_sp: a.posting_rewards_sp,
            curation_rewards_scr: a.curation_rewards_scr,
            curation_rewards_sp: a.curation_rewards_sp,
        })
        .collect();
    info!(
        blocks = summary.blocks_applied,
        rejected = summary.ops_rejected,
        cashouts = summary.cashouts,
        "replay finished"
    );
    Ok(summary)
}

pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn load_checkpoint(db: &StateDb) -> anyhow::Result<Option<(ChainState, RewardPools, BlockNum)>> {
    let Some(raw) = db.get_meta(LAST_BLOCK_KEY)? else {
        return Ok(None);
    };
    let bytes: [u8; 8] = raw
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("corrupt {LAST_BLOCK_KEY} record"))?;
    let pools: RewardPools = db
        .get_record(POOLS_KEY)?
        .ok_or_else(|| anyhow::anyhow!("stored state has no reward pools"))?;
    let state = db.load_state().context("loading stored state")?;
    Ok(Some((state, pools, u64::from_be_bytes(bytes))))
}

fn save_checkpoint(db: &StateDb, state: &ChainState, pools: &RewardPools, last_block: BlockNum) -> anyhow::Result<()> {
    db.save_state(state).context("saving state")?;
    db.put_fund(&pools.scr_fund)?;
    db.put_fund(&pools.sp_fund)?;
    db.put_record(POOLS_KEY, pools)?;
    db.put_meta(LAST_BLOCK_KEY, &last_block.to_be_bytes())?;
    db.flush()?;
    info!(last_block, "state saved");
    Ok(())
}
