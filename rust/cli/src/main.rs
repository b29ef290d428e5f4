// rust/cli/src/main.rs
#![forbid(unsafe_code)]

mod rollout;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::Env;
use log::info;

use crate::rollout::{NoopSink, RolloutSink, Runner, RunnerConfig, TableSink};
use twenty48_engine::{CornerPolicy, EngineConfig, GreedyPolicy, Policy, RandomPolicy};

#[derive(Parser, Debug)]
#[command(name = "twenty48_cli")]
struct Args {
    // ---------------- rollout sizing ----------------
    /// Total moves to execute across episodes.
    #[arg(long, default_value_t = 2000)]
    steps: u64,

    /// Base RNG seed (episodes use base_seed + episode_id). If omitted, a fixed default is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Policy: random | random-any | greedy | corner
    #[arg(long, default_value = "random")]
    policy: String,

    // ---------------- engine ----------------
    /// Engine config TOML. Missing keys keep their defaults.
    #[arg(long, value_name = "path")]
    config: Option<PathBuf>,

    /// Board side, overriding the config file.
    #[arg(long)]
    board_size: Option<usize>,

    /// Never force termination on repeated no-op moves.
    #[arg(long)]
    no_stuck_cap: bool,

    // ---------------- visualization ----------------
    /**
     * Render the board every move; value is sleep in ms (e.g. 30). Omit to disable rendering.
     * Examples:
     *   --render 0    (render as fast as possible)
     *   --render 30   (sleep 30ms between frames)
     */
    #[arg(long, value_name = "ms")]
    render: Option<u64>,

    // ---------------- output / reporting ----------------
    /// Verbosity: 0=silent (final summary only), 1=progress bar, 2=progress bar + periodic table.
    #[arg(long, default_value_t = 1)]
    verbosity: u8,

    /// Print a table row every N steps (only used with --verbosity 2).
    #[arg(long, default_value_t = 2000)]
    report_every: u64,
}

fn load_engine_config(args: &Args) -> Result<EngineConfig> {
    let mut cfg = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(n) = args.board_size {
        cfg.board_size = n;
        cfg.validate().context("invalid --board-size")?;
    }
    if args.no_stuck_cap {
        cfg.stuck_cap = None;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Episode seeds are derived from this base seed.
    let base_seed = args.seed.unwrap_or(12345);
    let engine = load_engine_config(&args)?;

    // Boxed so the CLI can switch implementations at runtime.
    let mut policy: Box<dyn Policy> = match args.policy.as_str() {
        "random" => Box::new(RandomPolicy::new(base_seed.wrapping_add(999))),
        "random-any" => Box::new(RandomPolicy::unrestricted(base_seed.wrapping_add(999))),
        "greedy" => Box::new(GreedyPolicy::new()),
        "corner" => Box::new(CornerPolicy::new()),
        other => bail!("unknown policy {other:?} (expected random | random-any | greedy | corner)"),
    };

    let cfg = RunnerConfig {
        steps: args.steps,
        base_seed,
        engine,

        verbosity: args.verbosity,
        report_every: args.report_every,

        render_ms: args.render,

        policy_name: args.policy.clone(),
    };

    let sink: Box<dyn RolloutSink> = if cfg.verbosity >= 2 && cfg.report_every > 0 {
        Box::new(TableSink::new(20))
    } else {
        Box::new(NoopSink)
    };

    let mut runner = Runner::new(cfg, sink);
    let report = runner.run(&mut *policy)?;

    // Final one-line summary (useful for logs / grep).
    info!(
        "DONE: policy={} board={}x{} steps_done={} elapsed={:.3}s steps/s={:.1} episodes_finished={} avg_ep_len={:.2} max_ep_len={} score/step={:.2} best_tile={} wins={} illegal_rate={:.4} avg_empty={:.2} avg_merges={:.2} corner_rate={:.3} total_score={} (last_ep_len={} last_terminated={})",
        report.policy,
        report.board_size,
        report.board_size,
        report.steps_done,
        report.elapsed_s,
        report.steps_per_s,
        report.episodes_finished,
        report.avg_ep_len,
        report.max_ep_len,
        report.score_per_step,
        report.best_tile,
        report.wins,
        report.illegal_rate,
        report.avg_empty,
        report.avg_merges_available,
        report.corner_rate,
        report.total_score,
        report.last_ep_len,
        report.last_terminated,
    );
    Ok(())
}
