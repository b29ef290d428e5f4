// rust/engine/src/policy/mod.rs
#![forbid(unsafe_code)]

mod base;
mod corner;
mod greedy;
mod random;

/**
 * Curated policy public API.
 *
 * Baseline agents used by the rollout CLI, benches and contract tests.
 */
pub use base::Policy;
pub use corner::CornerPolicy;
pub use greedy::GreedyPolicy;
pub use random::RandomPolicy;
