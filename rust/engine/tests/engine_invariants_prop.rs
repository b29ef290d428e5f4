// rust/engine/tests/engine_invariants_prop.rs
#![forbid(unsafe_code)]

/**
 * Property/invariant tests for the core transition kernel.
 *
 * Purpose:
 * - Provide fuzz-like coverage using generated seeds, board sizes and action streams.
 * - Lock core invariants that must hold regardless of policy logic.
 *
 * Invariants covered:
 * - Every cell is empty or a power of two >= 2.
 * - `action_mask` and `legal_directions` stay equivalent.
 * - A valid move conserves tile mass: sum after = sum before + spawned value.
 * - A valid move removes exactly `merges` tiles and spawns exactly one.
 * - `score` grows by exactly `merge_score`; `merge_score` is even.
 * - A no-op move leaves the board untouched and bumps `stuck_counter`.
 * - Natural game over implies a full board with no adjacent equal pair.
 */
use proptest::prelude::*;
use twenty48_engine::{Direction, EngineConfig, Game, Grid, slide};

fn assert_cells_well_formed(g: &Grid) {
    for &v in g.cells() {
        assert!(v == 0 || (v >= 2 && v.is_power_of_two()), "bad cell {v}");
    }
}

fn assert_mask_consistent(g: &Game) {
    let mask = g.action_mask();
    let from_mask: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| mask[d.action_id()])
        .collect();
    assert_eq!(from_mask, g.legal_directions());
}

#[test]
fn mask_and_legal_directions_stay_consistent_over_rollout() {
    let mut g = Game::new(20260228, EngineConfig::default()).unwrap();

    for i in 0..200usize {
        if g.is_terminated() {
            break;
        }
        assert_mask_consistent(&g);
        let dirs = g.legal_directions();
        let out = g.apply_move(dirs[i % dirs.len()]).unwrap();
        assert!(out.changed);
    }
}

proptest! {
    #[test]
    fn generated_rollout_respects_core_invariants(
        seed in any::<u64>(),
        size in 2usize..=5,
        actions in prop::collection::vec(0usize..4, 1..200),
    ) {
        let cfg = EngineConfig {
            stuck_cap: None,
            ..EngineConfig::with_board_size(size)
        };
        let mut g = Game::new(seed, cfg).unwrap();

        for aid in actions {
            if g.is_terminated() {
                break;
            }
            assert_cells_well_formed(g.grid());

            let before = g.clone();
            let t = g.step_action_id(aid).unwrap();
            let out_changed = g.last_move_changed_board;

            if out_changed {
                let sim = slide(before.grid(), Direction::from_action_id(aid).unwrap());
                prop_assert!(sim.changed);
                prop_assert_eq!(sim.merge_score % 2, 0);
                prop_assert_eq!(g.score, before.score + sim.merge_score);
                prop_assert_eq!(g.steps, before.steps + 1);
                prop_assert_eq!(g.stuck_counter, 0);
                prop_assert_eq!(
                    g.grid().occupied(),
                    before.grid().occupied() - sim.merges as usize + 1
                );
                let spawned = g.grid().tile_sum() - sim.grid.tile_sum();
                prop_assert!(spawned == 2 || spawned == 4);
                prop_assert_eq!(sim.grid.tile_sum(), before.grid().tile_sum());
            } else {
                prop_assert_eq!(g.grid(), before.grid());
                prop_assert_eq!(g.score, before.score);
                prop_assert_eq!(g.stuck_counter, before.stuck_counter + 1);
                prop_assert_eq!(t.reward, g.config().illegal_move_penalty);
            }
            prop_assert_eq!(g.moves, before.moves + 1);

            if g.over {
                prop_assert!(t.done);
                prop_assert_eq!(g.grid().count_empty(), 0);
                prop_assert!(!g.grid().matches_available());
                prop_assert!(g.legal_directions().is_empty());
            }
        }
    }

    #[test]
    fn slide_is_pure_and_bounded(
        cells in prop::collection::vec(prop::sample::select(vec![0u32, 2, 4, 8, 16]), 16),
        aid in 0usize..4,
    ) {
        let rows: Vec<&[u32]> = cells.chunks(4).collect();
        let grid = Grid::from_rows(&rows).unwrap();
        let dir = Direction::from_action_id(aid).unwrap();

        let a = slide(&grid, dir);
        let b = slide(&grid, dir);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.grid.tile_sum(), grid.tile_sum());
        prop_assert!(a.merges as usize <= grid.occupied() / 2);
        assert_cells_well_formed(&a.grid);

        // Tiles are packed after a slide; a repeat can only change the board by merging.
        let again = slide(&a.grid, dir);
        if again.changed {
            prop_assert!(again.merges > 0);
        }
    }
}
