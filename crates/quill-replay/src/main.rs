//! quill-replay: replays a JSON scenario through the reward engine.
//!
//! Sequence:
//!   1. Load and validate the scenario (params, genesis, blocks)
//!   2. Open the state database if `--data-dir` is given, resuming from it
//!   3. Per block: apply operations, run emission and cashout
//!   4. Print every event as a JSON line, then a summary

mod replay;
mod scenario;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use quill_state::StateDb;

use crate::replay::{run, write_json};
use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(
    name = "quill-replay",
    version,
    about = "Replay posts, votes and cashouts through the Quill reward engine"
)]
struct Args {
    /// Scenario JSON file.
    #[arg(long)]
    scenario: PathBuf,

    /// Directory for the persistent state database. Omit to run in memory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let scenario = Scenario::load(&args.scenario)?;
    info!(blocks = scenario.blocks.len(), "scenario loaded");

    let db = match &args.data_dir {
        Some(dir) => {
            let dir = expand_tilde(dir);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating data dir {}", dir.display()))?;
            Some(StateDb::open(&dir).context("opening state database")?)
        }
        None => None,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run(&scenario, db.as_ref(), &mut out, args.pretty)?;
    write_json(&mut out, &serde_json::json!({ "summary": summary }), args.pretty)?;
    Ok(())
}

/// Expand a leading `~` to the user's home directory (`HOME` or `USERPROFILE`).
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
