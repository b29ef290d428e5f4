// rust/engine/tests/policy_contracts.rs
#![forbid(unsafe_code)]

/**
 * Cross-policy contract tests.
 *
 * Purpose:
 * - Enforce shared behavior contracts for policy implementations:
 *   legal direction selection, determinism, and input-state purity.
 *
 * Covered policies:
 * - `RandomPolicy` (seeded; legal-only and unrestricted variants)
 * - `GreedyPolicy` (one-ply merge lookahead)
 * - `CornerPolicy` (fixed preference order)
 *
 * Policies are generic over the game's spawn RNG, so they also drive games built with
 * `Game::with_rng`.
 */
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use twenty48_engine::{
    CornerPolicy, EngineConfig, Game, GreedyPolicy, Grid, Policy, RandomPolicy, Status,
};

#[derive(Clone, Debug, Eq, PartialEq)]
struct GameSnapshot {
    grid: Grid,
    score: u64,
    steps: u64,
    moves: u64,
    stuck_counter: u32,
    status: Status,
}

fn snapshot(g: &Game) -> GameSnapshot {
    GameSnapshot {
        grid: g.grid().clone(),
        score: g.score,
        steps: g.steps,
        moves: g.moves,
        stuck_counter: g.stuck_counter,
        status: g.status(),
    }
}

fn fixture_game() -> Game {
    let rows = [[2, 2, 4, 0], [0, 8, 4, 0], [16, 0, 0, 2], [32, 64, 0, 2]];
    Game::from_grid(Grid::from_rows(&rows).unwrap(), 987654, EngineConfig::default()).unwrap()
}

fn blocked_game() -> Game {
    let rows = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
    Game::from_grid(Grid::from_rows(&rows).unwrap(), 1, EngineConfig::default()).unwrap()
}

fn policies() -> Vec<(&'static str, Box<dyn Policy>)> {
    vec![
        ("random", Box::new(RandomPolicy::new(123))),
        ("greedy", Box::new(GreedyPolicy::new())),
        ("corner", Box::new(CornerPolicy::new())),
    ]
}

fn assert_legal_or_none(policy: &mut dyn Policy, g: &Game) {
    let legal = g.legal_directions();
    match policy.choose_direction(g) {
        Some(dir) => assert!(legal.contains(&dir)),
        None => assert!(legal.is_empty()),
    }
}

#[test]
fn policies_return_legal_directions() {
    let g = fixture_game();
    for (name, mut p) in policies() {
        for _ in 0..20 {
            assert_legal_or_none(p.as_mut(), &g);
        }
        assert!(p.choose_direction(&g).is_some(), "{name}");
    }
}

#[test]
fn policies_do_not_mutate_game() {
    let g = fixture_game();
    let before = snapshot(&g);
    for (_, mut p) in policies() {
        let _ = p.choose_direction(&g);
        assert_eq!(before, snapshot(&g));
    }
}

#[test]
fn policies_return_none_on_blocked_board() {
    let g = blocked_game();
    for (name, mut p) in policies() {
        assert_eq!(p.choose_direction(&g), None, "{name}");
    }
}

#[test]
fn random_policy_is_seed_deterministic_for_fixed_state() {
    let g = fixture_game();
    let mut p1 = RandomPolicy::new(42);
    let mut p2 = RandomPolicy::new(42);
    for _ in 0..12 {
        assert_eq!(p1.choose_direction(&g), p2.choose_direction(&g));
    }
}

#[test]
fn deterministic_policies_repeat_their_choice() {
    let g = fixture_game();
    let mut greedy = GreedyPolicy::new();
    let mut corner = CornerPolicy::new();
    assert_eq!(greedy.choose_direction(&g), greedy.choose_direction(&g));
    assert_eq!(corner.choose_direction(&g), corner.choose_direction(&g));
}

#[test]
fn unrestricted_random_policy_eventually_hits_the_stuck_cap() {
    // A lone tile in a corner: two of four directions are no-ops.
    let rows = [[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]];
    let mut g = Game::from_grid(Grid::from_rows(&rows).unwrap(), 5, EngineConfig::default())
        .unwrap();
    let mut p = RandomPolicy::unrestricted(7);

    let mut illegal = 0u32;
    for _ in 0..10_000 {
        if g.is_terminated() {
            break;
        }
        let dir = p.choose_direction(&g).unwrap();
        let out = g.apply_move(dir).unwrap();
        if !out.changed {
            illegal += 1;
        }
    }
    assert!(g.is_terminated());
    assert!(illegal >= 2);
}

#[test]
fn policies_play_full_episodes() {
    for (name, mut p) in policies() {
        let mut g = Game::new(2024, EngineConfig::default()).unwrap();
        let mut guard = 0;
        while !g.is_terminated() && guard < 100_000 {
            let Some(dir) = p.choose_direction(&g) else {
                break;
            };
            let out = g.apply_move(dir).unwrap();
            assert!(out.changed, "{name}");
            guard += 1;
        }
        assert!(g.is_terminated(), "{name}");
        assert!(g.over, "{name}");
        assert_eq!(g.stuck_counter, 0, "{name}");
        assert!(g.max_tile() >= 16, "{name}");
    }
}

fn play_out<R: Rng>(policy: &mut dyn Policy<R>, g: &mut Game<R>) -> u64 {
    while !g.is_terminated() {
        let Some(dir) = policy.choose_direction(g) else {
            break;
        };
        let out = g.apply_move(dir).unwrap();
        assert!(out.changed);
    }
    g.steps
}

#[test]
fn policies_drive_games_with_an_injected_rng() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut g = Game::with_rng(EngineConfig::default(), &mut rng).unwrap();
    assert!(play_out(&mut GreedyPolicy::new(), &mut g) > 0);
    assert!(g.over);

    let mut rng = StdRng::seed_from_u64(32);
    let mut g = Game::with_rng(EngineConfig::default(), &mut rng).unwrap();
    assert!(play_out(&mut CornerPolicy::new(), &mut g) > 0);
    assert!(g.over);

    let mut rng = StdRng::seed_from_u64(33);
    let mut g = Game::with_rng(EngineConfig::default(), &mut rng).unwrap();
    assert!(play_out(&mut RandomPolicy::new(5), &mut g) > 0);
    assert!(g.over);
}
