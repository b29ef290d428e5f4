// rust/cli/src/rollout/stats.rs
#![forbid(unsafe_code)]

use std::time::Instant;

use twenty48_engine::engine::{BoardFeatures, MoveOutcome, compute_step_features};
use twenty48_engine::Grid;

#[inline]
fn mean(sum: f64, n: u64) -> f64 {
    if n > 0 { sum / n as f64 } else { 0.0 }
}

#[derive(Clone, Debug)]
pub struct RolloutStats {
    pub episodes_finished: u64,
    pub ep_len: u64,
    pub episode_len_sum: u64,
    pub episode_len_max: u64,

    /// Policy decisions applied (changed or not).
    pub steps_done: u64,
    pub illegal_moves: u64,
    pub wins: u64,
    pub best_tile: u32,

    // board feature aggregates (absolute, across ALL steps)
    pub sum_empty: f64,
    pub sum_merges_available: f64,
    pub corner_steps: u64,

    // delta aggregates (difference between consecutive steps)
    pub sum_d_empty: f64,
    pub sum_d_tile_sum: f64,

    prev_features: Option<BoardFeatures>,
    t0: Instant,
}

impl Default for RolloutStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            episodes_finished: 0,
            ep_len: 0,
            episode_len_sum: 0,
            episode_len_max: 0,
            steps_done: 0,
            illegal_moves: 0,
            wins: 0,
            best_tile: 0,
            sum_empty: 0.0,
            sum_merges_available: 0.0,
            corner_steps: 0,
            sum_d_empty: 0.0,
            sum_d_tile_sum: 0.0,
            prev_features: None,
            t0: Instant::now(),
        }
    }

    /// Call once per applied move with the post-move board.
    pub fn on_step(&mut self, grid: &Grid, outcome: &MoveOutcome) {
        self.steps_done += 1;
        self.ep_len += 1;
        if !outcome.changed {
            self.illegal_moves += 1;
        }
        if outcome.won_now {
            self.wins += 1;
        }

        let f = compute_step_features(grid, self.prev_features);
        self.best_tile = self.best_tile.max(f.cur.max_tile);
        self.sum_empty += f64::from(f.cur.empty);
        self.sum_merges_available += f64::from(f.cur.merges_available);
        if f.cur.max_in_corner {
            self.corner_steps += 1;
        }

        self.sum_d_empty += f64::from(f.delta.d_empty);
        self.sum_d_tile_sum += f.delta.d_tile_sum as f64;

        self.prev_features = Some(f.cur);
    }

    /// Call when an episode terminates, before resetting the game.
    pub fn on_episode_end(&mut self) {
        self.episodes_finished += 1;
        self.episode_len_sum += self.ep_len;
        self.episode_len_max = self.episode_len_max.max(self.ep_len);

        self.ep_len = 0;
        self.prev_features = None; // don't carry deltas across episodes
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.t0.elapsed().as_secs_f64()
    }

    pub fn steps_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.steps_done as f64 / dt
        } else {
            0.0
        }
    }

    pub fn avg_ep_len(&self) -> f64 {
        mean(self.episode_len_sum as f64, self.episodes_finished)
    }

    pub fn illegal_rate(&self) -> f64 {
        mean(self.illegal_moves as f64, self.steps_done)
    }

    pub fn avg_empty(&self) -> f64 {
        mean(self.sum_empty, self.steps_done)
    }

    pub fn avg_merges_available(&self) -> f64 {
        mean(self.sum_merges_available, self.steps_done)
    }

    pub fn corner_rate(&self) -> f64 {
        mean(self.corner_steps as f64, self.steps_done)
    }

    pub fn avg_d_empty(&self) -> f64 {
        mean(self.sum_d_empty, self.steps_done)
    }

    pub fn avg_d_tile_sum(&self) -> f64 {
        mean(self.sum_d_tile_sum, self.steps_done)
    }

    pub fn score_per_step(&self, live_total_score: u64) -> f64 {
        mean(live_total_score as f64, self.steps_done)
    }

    pub fn live_msg(&self, score_per_step: f64) -> String {
        format!(
            "sps={:.1} eps={} avg_ep={:.1} max_ep={} score/step={:.2} best={} wins={} illegal={:.3} avgEmpty={:.2}",
            self.steps_per_sec(),
            self.episodes_finished,
            self.avg_ep_len(),
            self.episode_len_max,
            score_per_step,
            self.best_tile,
            self.wins,
            self.illegal_rate(),
            self.avg_empty(),
        )
    }

    pub fn final_report(
        &self,
        policy_name: &str,
        board_size: usize,
        total_score: u64,
        last_ep_len: u64,
        last_terminated: bool,
    ) -> FinalReport {
        FinalReport {
            policy: policy_name.to_string(),
            board_size,

            steps_done: self.steps_done,
            elapsed_s: self.elapsed_secs(),
            steps_per_s: self.steps_per_sec(),
            episodes_finished: self.episodes_finished,
            avg_ep_len: self.avg_ep_len(),
            max_ep_len: self.episode_len_max,
            score_per_step: self.score_per_step(total_score),
            best_tile: self.best_tile,
            wins: self.wins,
            illegal_rate: self.illegal_rate(),
            avg_empty: self.avg_empty(),
            avg_merges_available: self.avg_merges_available(),
            corner_rate: self.corner_rate(),
            total_score,
            last_ep_len,
            last_terminated,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FinalReport {
    pub policy: String,
    pub board_size: usize,

    pub steps_done: u64,
    pub elapsed_s: f64,
    pub steps_per_s: f64,

    pub episodes_finished: u64,
    pub avg_ep_len: f64,
    pub max_ep_len: u64,

    pub score_per_step: f64,
    pub best_tile: u32,
    pub wins: u64,
    pub illegal_rate: f64,

    pub avg_empty: f64,
    pub avg_merges_available: f64,
    pub corner_rate: f64,

    pub total_score: u64,

    pub last_ep_len: u64,
    pub last_terminated: bool,
}
