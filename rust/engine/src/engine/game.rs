// rust/engine/src/engine/game.rs
#![forbid(unsafe_code)]

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::config::{EngineConfig, StuckCounting};
use crate::engine::direction::Direction;
use crate::engine::error::EngineError;
use crate::engine::grid::Grid;
use crate::engine::slide::{slide, SlideOutcome};
use crate::engine::spawn::{SpawnRule, SpawnedTile};

/// Coarse lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Active,
    /// `n` no-op moves counted and not yet cleared by a board-changing move.
    Stuck(u32),
    Over,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub direction: Direction,
    /// True iff the slide changed the board (and therefore a tile was spawned).
    pub changed: bool,
    pub merges: u32,
    /// Score gained from merges on this move.
    pub merge_score: u64,
    /// Reward reported to the agent: merge score + shaping, or the illegal-move penalty.
    pub reward: i64,
    pub spawned: Option<SpawnedTile>,
    /// True iff this move produced the first tile reaching `winning_value`.
    pub won_now: bool,
    /// True game over after this move, OR engine was already terminated.
    pub terminated: bool,
}

/// `(observation, reward, done)` as consumed by an environment adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Row-major raw cell values.
    pub observation: Vec<u32>,
    pub reward: i64,
    pub done: bool,
}

#[derive(Clone, Debug)]
pub struct Game<R = StdRng> {
    grid: Grid,
    config: EngineConfig,
    spawn: SpawnRule<R>,

    /// Total value produced by merges since the last restart.
    pub score: u64,
    /// Reward of the most recent move.
    pub reward: i64,
    pub total_reward: i64,
    pub stuck_counter: u32,
    /// Board-changing moves since the last restart.
    pub steps: u64,
    /// Accepted `apply_move` calls since the last restart (changed or not).
    pub moves: u64,
    /// Natural game over: board full and no merge available.
    pub over: bool,
    pub won: bool,
    pub keep_playing: bool,
    pub last_move_changed_board: bool,
}

impl Game<StdRng> {
    /// Fresh game whose spawn stream is `StdRng::seed_from_u64(seed)`.
    pub fn new(seed: u64, config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Start from an explicit board (tests, puzzles, replays). No tiles are spawned.
    pub fn from_grid(grid: Grid, seed: u64, config: EngineConfig) -> Result<Self, EngineError> {
        Self::from_grid_with_rng(grid, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    /// Fresh game drawing spawns from an injected RNG.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        let mut g = Self::blank(Grid::new(config.board_size)?, config, rng);
        g.new_game()?;
        Ok(g)
    }

    pub fn from_grid_with_rng(grid: Grid, config: EngineConfig, rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        if grid.size() != config.board_size {
            return Err(EngineError::InvalidGrid(format!(
                "grid side {} does not match board_size {}",
                grid.size(),
                config.board_size
            )));
        }
        let mut g = Self::blank(grid, config, rng);
        g.over = g.grid.is_dead();
        Ok(g)
    }

    fn blank(grid: Grid, config: EngineConfig, rng: R) -> Self {
        let spawn = SpawnRule::new(rng, config.four_probability);
        let keep_playing = config.keep_playing;
        Self {
            grid,
            config,
            spawn,
            score: 0,
            reward: 0,
            total_reward: 0,
            stuck_counter: 0,
            steps: 0,
            moves: 0,
            over: false,
            won: false,
            keep_playing,
            last_move_changed_board: false,
        }
    }

    /// Clear the board, reset every counter and spawn the start tiles.
    fn new_game(&mut self) -> Result<(), EngineError> {
        self.grid.clear();
        self.score = 0;
        self.reward = 0;
        self.total_reward = 0;
        self.stuck_counter = 0;
        self.steps = 0;
        self.moves = 0;
        self.over = false;
        self.won = false;
        self.keep_playing = self.config.keep_playing;
        self.last_move_changed_board = false;

        for _ in 0..self.config.start_tiles {
            self.spawn.spawn(&mut self.grid)?;
        }
        Ok(())
    }

    /// Back to `Active` with a freshly seeded board. The RNG stream continues.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.new_game()
    }

    // -------------------------------------------------------------------------
    // Mutating step
    // -------------------------------------------------------------------------

    /**
     * Slide the board toward `direction`, then score, spawn and check termination.
     *
     * Engine semantics:
     * - A move that leaves the board unchanged is illegal: reward = `illegal_move_penalty`,
     *   `stuck_counter += 1`, no spawn, `steps` unchanged.
     * - A board-changing move adds its merge score, spawns exactly one tile and (for
     *   consecutive counting) clears `stuck_counter`.
     * - Once terminated, moves are a silent no-op reporting `terminated = true` until
     *   `restart()`.
     */
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveOutcome, EngineError> {
        if self.is_terminated() {
            return Ok(MoveOutcome {
                direction,
                changed: false,
                merges: 0,
                merge_score: 0,
                reward: 0,
                spawned: None,
                won_now: false,
                terminated: true,
            });
        }

        self.moves += 1;
        let SlideOutcome {
            grid,
            merge_score,
            merges,
            max_merged,
            changed,
        } = slide(&self.grid, direction);
        self.last_move_changed_board = changed;

        if !changed {
            let penalty = self.config.illegal_move_penalty;
            self.reward = penalty;
            self.total_reward = self.total_reward.saturating_add(penalty);
            self.stuck_counter += 1;
            trace!(
                "illegal move {direction}: stuck_counter={}",
                self.stuck_counter
            );

            let terminated = self.is_terminated();
            if terminated {
                debug!(
                    "terminated: stuck_counter={} exceeded cap {:?}",
                    self.stuck_counter, self.config.stuck_cap
                );
            }
            return Ok(MoveOutcome {
                direction,
                changed: false,
                merges: 0,
                merge_score: 0,
                reward: penalty,
                spawned: None,
                won_now: false,
                terminated,
            });
        }

        self.grid = grid;
        self.score += merge_score;
        self.steps += 1;
        if self.config.stuck_counting == StuckCounting::Consecutive {
            self.stuck_counter = 0;
        }

        let won_now = !self.won && max_merged >= self.config.winning_value;
        if won_now {
            self.won = true;
            debug!(
                "reached {} after {} steps (score={})",
                max_merged, self.steps, self.score
            );
        }

        // Shaping sees the slid board, before the spawn adds noise.
        let bonus = self.config.reward_shaping.bonus(&self.grid);
        let reward = (merge_score as i64).saturating_add(bonus);
        self.reward = reward;
        self.total_reward = self.total_reward.saturating_add(reward);

        let spawned = self.spawn.spawn(&mut self.grid)?;

        if self.grid.is_dead() {
            self.over = true;
            debug!(
                "game over: no moves left (score={} max_tile={} steps={})",
                self.score,
                self.grid.max_tile(),
                self.steps
            );
        }

        Ok(MoveOutcome {
            direction,
            changed: true,
            merges,
            merge_score,
            reward,
            spawned: Some(spawned),
            won_now,
            terminated: self.is_terminated(),
        })
    }

    // -------------------------------------------------------------------------
    // Adapter surface: reset / step / render
    // -------------------------------------------------------------------------

    /// Restart and return the initial observation.
    pub fn reset(&mut self) -> Result<Vec<u32>, EngineError> {
        self.restart()?;
        Ok(self.observation())
    }

    /// One move, reported as `(observation, reward, done)`.
    pub fn step(&mut self, direction: Direction) -> Result<Transition, EngineError> {
        let outcome = self.apply_move(direction)?;
        Ok(Transition {
            observation: self.observation(),
            reward: outcome.reward,
            done: outcome.terminated,
        })
    }

    /// `step` by integer action id (0=up, 1=right, 2=down, 3=left).
    pub fn step_action_id(&mut self, action_id: usize) -> Result<Transition, EngineError> {
        self.step(Direction::from_action_id(action_id)?)
    }

    pub fn rng_mut(&mut self) -> &mut R {
        self.spawn.rng_mut()
    }
}

impl<R> Game<R> {
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Terminal iff the board is dead, the stuck cap is exceeded, or the game was won
    /// without the keep-playing override.
    pub fn is_terminated(&self) -> bool {
        self.over
            || self.config.stuck_exceeded(self.stuck_counter)
            || (self.won && !self.keep_playing)
    }

    pub fn status(&self) -> Status {
        if self.is_terminated() {
            Status::Over
        } else if self.stuck_counter > 0 {
            Status::Stuck(self.stuck_counter)
        } else {
            Status::Active
        }
    }

    /// The "keep playing" button: lift a win-induced stop. Other terminal reasons stay.
    pub fn continue_after_win(&mut self) {
        self.keep_playing = true;
    }

    // -------------------------------------------------------------------------
    // Pure queries (no state change, no randomness)
    // -------------------------------------------------------------------------

    pub fn simulate(&self, direction: Direction) -> SlideOutcome {
        slide(&self.grid, direction)
    }

    pub fn is_legal(&self, direction: Direction) -> bool {
        slide(&self.grid, direction).changed
    }

    /// Directions that would change the board, in action-id order.
    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.is_legal(d))
            .collect()
    }

    pub fn action_mask(&self) -> [bool; 4] {
        Direction::ALL.map(|d| self.is_legal(d))
    }

    pub fn observation(&self) -> Vec<u32> {
        self.grid.cells().to_vec()
    }

    /// Position -> value snapshot.
    pub fn snapshot(&self) -> Vec<Vec<u32>> {
        self.grid.rows()
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    /// Diagnostic text view: the board plus one status line.
    pub fn render(&self) -> String {
        let mut s = self.grid.to_string();
        s.push_str(&format!(
            "score={} reward={} steps={} moves={} stuck={} status={:?} won={}\n",
            self.score,
            self.reward,
            self.steps,
            self.moves,
            self.stuck_counter,
            self.status(),
            self.won
        ));
        s
    }
}
