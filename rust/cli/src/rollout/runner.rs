// rust/cli/src/rollout/runner.rs
#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use twenty48_engine::engine::{EngineConfig, Game};
use twenty48_engine::policy::Policy;

use super::sinks::{ReportRow, RolloutSink};
use super::stats::{FinalReport, RolloutStats};

/// Fixed internal cadence for progress-bar live message updates.
const LIVE_EVERY: u64 = 200;

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    // ---------------- core rollout ----------------
    /// Total moves to execute across episodes.
    pub steps: u64,
    /// Base seed; each episode uses base_seed + episode_id.
    pub base_seed: u64,
    pub engine: EngineConfig,

    /// Used only for the final report string.
    pub policy_name: String,

    // ---------------- output ----------------
    /// 0 = final summary only
    /// 1 = progress bar
    /// 2 = progress bar + periodic table (via sink)
    pub verbosity: u8,

    /// Print a table row every N steps (only used when verbosity == 2).
    /// 0 disables table reporting.
    pub report_every: u64,

    // ---------------- rendering ----------------
    /// If Some(ms): render every step; sleep ms between frames (0 = no sleep).
    pub render_ms: Option<u64>,
}

pub struct Runner {
    cfg: RunnerConfig,
    sink: Box<dyn RolloutSink>,
}

impl Runner {
    pub fn new(cfg: RunnerConfig, sink: Box<dyn RolloutSink>) -> Self {
        Self { cfg, sink }
    }

    fn new_episode(&self, episode_id: u64) -> Result<Game> {
        let seed = self.cfg.base_seed.wrapping_add(episode_id);
        Game::new(seed, self.cfg.engine.clone())
            .with_context(|| format!("failed to start episode {episode_id} (seed {seed})"))
    }

    pub fn run(&mut self, policy: &mut dyn Policy) -> Result<FinalReport> {
        let cfg = self.cfg.clone();

        // Progress bar is UI only; runner logic does not depend on it.
        let pb = if cfg.verbosity >= 1 {
            let pb = ProgressBar::new(cfg.steps);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos:>9}/{len:<9}  {percent:>3}%  {elapsed_precise}  {msg}",
                )
                .context("invalid progress bar template")?
                .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stats = RolloutStats::new();

        let mut episode_id: u64 = 0;
        let mut game = self.new_episode(episode_id)?;
        // Set when the policy has nothing to play on a live board.
        let mut abandoned = false;

        // Score of completed episodes (live totals include the current episode too).
        let mut total_score_finished: u64 = 0;

        if cfg.render_ms.is_some() {
            print!("{}", game.render());
        }

        while stats.steps_done < cfg.steps {
            // ------------------------------------------------------------
            // Episode boundary: finalize counters, then reset.
            // ------------------------------------------------------------
            if game.is_terminated() || abandoned {
                stats.on_episode_end();
                total_score_finished += game.score;
                debug!(
                    "episode {episode_id} done: len={} score={} max_tile={} status={:?}",
                    game.moves,
                    game.score,
                    game.max_tile(),
                    game.status()
                );

                episode_id += 1;
                game = self.new_episode(episode_id)?;
                abandoned = false;

                if cfg.render_ms.is_some() {
                    println!(
                        "=== reset: episodes_finished={} avg_ep_len={:.2} max_ep_len={} ===",
                        stats.episodes_finished,
                        stats.avg_ep_len(),
                        stats.episode_len_max
                    );
                    print!("{}", game.render());
                }
                continue;
            }

            // ------------------------------------------------------------
            // One move: policy chooses a direction.
            // ------------------------------------------------------------
            let Some(dir) = policy.choose_direction(&game) else {
                abandoned = true;
                continue;
            };

            let outcome = game.apply_move(dir)?;
            stats.on_step(game.grid(), &outcome);

            if let Some(ref pb) = pb {
                pb.inc(1);
            }

            if let Some(ms) = cfg.render_ms {
                println!(
                    "step={} dir={} reward={} changed={}",
                    stats.steps_done, dir, outcome.reward, outcome.changed
                );
                print!("{}", game.render());
                if ms > 0 {
                    std::thread::sleep(Duration::from_millis(ms));
                }
            }

            // ------------------------------------------------------------
            // Periodic table report (verbosity == 2 only), aggregate stats only.
            // ------------------------------------------------------------
            if cfg.verbosity == 2
                && cfg.report_every > 0
                && (stats.steps_done % cfg.report_every == 0)
            {
                let live_total_score = total_score_finished + game.score;

                let row = ReportRow {
                    step: stats.steps_done,
                    steps_total: cfg.steps,
                    sps: stats.steps_per_sec(),

                    episodes_finished: stats.episodes_finished,
                    avg_ep_len: stats.avg_ep_len(),
                    max_ep_len: stats.episode_len_max,

                    score_per_step: stats.score_per_step(live_total_score),
                    best_tile: stats.best_tile,
                    wins: stats.wins,
                    illegal_rate: stats.illegal_rate(),

                    avg_empty: stats.avg_empty(),
                    avg_merges_available: stats.avg_merges_available(),
                    corner_rate: stats.corner_rate(),

                    avg_d_empty: stats.avg_d_empty(),
                    avg_d_tile_sum: stats.avg_d_tile_sum(),
                };

                self.sink.on_report_row(&row, pb.as_ref());
            }

            if cfg.verbosity >= 1 && (stats.steps_done % LIVE_EVERY == 0) {
                let live_total_score = total_score_finished + game.score;
                let msg = stats.live_msg(stats.score_per_step(live_total_score));
                if let Some(ref pb) = pb {
                    pb.set_message(msg);
                }
            }
        }

        // Include current in-progress episode in totals.
        let total_score = total_score_finished + game.score;

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        Ok(stats.final_report(
            &cfg.policy_name,
            cfg.engine.board_size,
            total_score,
            stats.ep_len,
            game.is_terminated(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::NoopSink;
    use twenty48_engine::policy::{CornerPolicy, GreedyPolicy, RandomPolicy};

    fn quiet_config(steps: u64, engine: EngineConfig) -> RunnerConfig {
        RunnerConfig {
            steps,
            base_seed: 12345,
            engine,
            policy_name: "test".to_string(),
            verbosity: 0,
            report_every: 0,
            render_ms: None,
        }
    }

    #[test]
    fn runs_exactly_the_requested_number_of_steps() {
        let mut runner = Runner::new(quiet_config(3000, EngineConfig::default()), Box::new(NoopSink));
        let report = runner.run(&mut GreedyPolicy::new()).unwrap();

        assert_eq!(report.steps_done, 3000);
        assert!(report.episodes_finished >= 1);
        assert!(report.max_ep_len as f64 >= report.avg_ep_len);
        assert_eq!(report.illegal_rate, 0.0);
        assert!(report.best_tile >= 64);
    }

    #[test]
    fn same_seed_gives_same_report() {
        let run = || {
            let mut runner =
                Runner::new(quiet_config(1500, EngineConfig::default()), Box::new(NoopSink));
            runner.run(&mut CornerPolicy::new()).unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.total_score, b.total_score);
        assert_eq!(a.episodes_finished, b.episodes_finished);
        assert_eq!(a.best_tile, b.best_tile);
        assert_eq!(a.last_ep_len, b.last_ep_len);
    }

    #[test]
    fn unrestricted_policy_records_illegal_moves() {
        let mut runner = Runner::new(
            quiet_config(2000, EngineConfig::with_board_size(3)),
            Box::new(NoopSink),
        );
        let report = runner.run(&mut RandomPolicy::unrestricted(9)).unwrap();
        assert_eq!(report.board_size, 3);
        assert!(report.illegal_rate > 0.0);
        assert!(report.episodes_finished >= 1);
    }
}
