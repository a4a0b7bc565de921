//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full MCTS search with varying simulation counts
//! - Store operations (expansion, backup, policy extraction)
//! - Search from different game states (opening, midgame)
//! - Game comparison (TicTacToe vs Connect4)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engine_core::game_utils::play_actions;
use engine_core::{Game, StateKey};
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use mcts::{visits_to_policy, MctsConfig, MctsSearch, RandomEvaluator, StatsStore, UniformEvaluator};

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_mcts_search_simulations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_simulations");
    let game = TicTacToe::new();
    let root = game.initial_position();
    let evaluator = UniformEvaluator::new();

    for sims in [50u32, 100, 200, 400, 800, 1600] {
        group.throughput(Throughput::Elements(sims as u64));
        group.bench_with_input(BenchmarkId::new("tictactoe", sims), &sims, |b, &sims| {
            b.iter(|| {
                let mut store = StatsStore::new();
                let mut search =
                    MctsSearch::new(&game, &evaluator, &mut store, MctsConfig::for_testing())
                        .unwrap();
                black_box(search.get_action_probabilities_with(&root, sims, 0.0).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_mcts_game_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_game_comparison");
    let sims = 200u32;
    group.throughput(Throughput::Elements(sims as u64));

    group.bench_function("tictactoe", |b| {
        let game = TicTacToe::new();
        let root = game.initial_position();
        let evaluator = RandomEvaluator::new(42);
        b.iter(|| {
            let mut store = StatsStore::new();
            let mut search =
                MctsSearch::new(&game, &evaluator, &mut store, MctsConfig::default()).unwrap();
            black_box(search.run(&root, sims).unwrap())
        });
    });

    group.bench_function("connect4", |b| {
        let game = Connect4::new();
        let root = game.initial_position();
        let evaluator = RandomEvaluator::new(42);
        b.iter(|| {
            let mut store = StatsStore::new();
            let mut search =
                MctsSearch::new(&game, &evaluator, &mut store, MctsConfig::default()).unwrap();
            black_box(search.run(&root, sims).unwrap())
        });
    });

    group.finish();
}

fn bench_mcts_midgame(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_midgame");
    let evaluator = UniformEvaluator::new();

    let game = Connect4::new();
    let (root, _) = play_actions(&game, &[3, 3, 2, 4, 4, 2, 5]).unwrap();
    group.bench_function("connect4_7_plies", |b| {
        b.iter(|| {
            let mut store = StatsStore::new();
            let mut search =
                MctsSearch::new(&game, &evaluator, &mut store, MctsConfig::default()).unwrap();
            black_box(search.run(&root, 400).unwrap())
        });
    });

    group.finish();
}

// =============================================================================
// Store Operation Benchmarks
// =============================================================================

fn bench_store_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_operations");
    let key = StateKey::from("bench-root");

    group.bench_function("record_expansion", |b| {
        b.iter(|| {
            let mut store = StatsStore::new();
            store
                .record_expansion(key.clone(), vec![1.0 / 7.0; 7])
                .unwrap();
            black_box(store.len())
        });
    });

    group.bench_function("record_backup", |b| {
        let mut store = StatsStore::new();
        store
            .record_expansion(key.clone(), vec![1.0 / 7.0; 7])
            .unwrap();
        let mut action = 0;
        b.iter(|| {
            action = (action + 1) % 7;
            store.record_backup(&key, action, black_box(0.5)).unwrap();
        });
    });

    group.bench_function("visits_to_policy", |b| {
        let visits = [12u32, 40, 7, 0, 99, 3, 18];
        b.iter(|| {
            black_box(visits_to_policy(black_box(&visits), 1.0).unwrap());
            black_box(visits_to_policy(black_box(&visits), 0.5).unwrap());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mcts_search_simulations,
    bench_mcts_game_comparison,
    bench_mcts_midgame,
    bench_store_operations,
);
criterion_main!(benches);
