//! End-to-end searches over the bundled games.

use engine_core::game_utils::play_actions;
use engine_core::{Game, Outcome, Player};
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use mcts::{
    run_mcts, run_mcts_with_store, sample_action, MctsConfig, MctsSearch, RandomEvaluator,
    StatsStore, UniformEvaluator,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn connect4_takes_horizontal_win() {
    // Red holds columns 1-3 on the bottom row; columns 0 and 4 both win.
    let game = Connect4::new();
    let (root, to_move) = play_actions(&game, &[1, 6, 2, 6, 3, 5]).unwrap();
    assert_eq!(to_move, Player::First);

    let config = MctsConfig::for_evaluation().with_simulations(500);
    let result = run_mcts(&game, &UniformEvaluator::new(), config, &root).unwrap();

    assert!(
        result.action == 0 || result.action == 4,
        "visits: {:?}",
        result.visits
    );
    assert!(result.root_value > 0.0);
}

#[test]
fn transpositions_share_statistics() {
    let game = TicTacToe::new();
    let (a, _) = play_actions(&game, &[0, 4, 8]).unwrap();
    let (b, _) = play_actions(&game, &[8, 4, 0]).unwrap();
    assert_eq!(game.state_key(&a), game.state_key(&b));

    let evaluator = UniformEvaluator::new();
    let mut store = StatsStore::new();
    let config = MctsConfig::for_testing().with_simulations(20);
    run_mcts_with_store(&game, &evaluator, config.clone(), &a, &mut store, None).unwrap();
    let states = store.len();

    // The second move order lands on an already expanded root.
    let mut search = MctsSearch::new(&game, &evaluator, &mut store, config).unwrap();
    search.run(&b, 1).unwrap();
    let stats = search.stats();
    assert_eq!(search.root_visits(&b).iter().sum::<u32>(), 20);
    assert!(stats.expansions <= 1);
    assert!(store.len() <= states + 1);
}

#[test]
fn self_play_reaches_a_result() {
    for seed in 0..4u64 {
        let game = TicTacToe::new();
        let evaluator = RandomEvaluator::new(seed);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let config = MctsConfig::for_training().with_simulations(60);

        let mut position = game.initial_position();
        let mut to_move = Player::First;
        let mut plies = 0;

        let outcome = loop {
            if let Some(outcome) = game.terminal_outcome(&position, to_move) {
                break outcome;
            }
            assert!(plies < 9, "tictactoe cannot last more than 9 plies");

            let canonical = game.canonical_form(&position, to_move);
            let result = run_mcts(&game, &evaluator, config.clone(), &canonical).unwrap();
            let action = sample_action(&result.policy, &mut rng).unwrap();

            let legal = game.legal_action_mask(&position);
            assert!(legal[action], "seed {} chose illegal action {}", seed, action);

            let (next, relative) = game.apply_action(&position, action).unwrap();
            position = next;
            if relative == Player::Second {
                to_move = to_move.opponent();
            }
            plies += 1;
        };

        assert!(plies >= 5);
        // The player to move at the end never won: it is a loss or a draw.
        assert_ne!(outcome, Outcome::Win);
    }
}

#[test]
fn search_blocks_connect4_threat() {
    // Yellow has three stacked in column 0; Red must answer there.
    let game = Connect4::new();
    let (root, to_move) = play_actions(&game, &[6, 0, 5, 0, 6, 0]).unwrap();
    assert_eq!(to_move, Player::First);

    let config = MctsConfig::for_evaluation().with_simulations(1000);
    let result = run_mcts(&game, &UniformEvaluator::new(), config, &root).unwrap();

    assert_eq!(result.action, 0, "visits: {:?}", result.visits);
}
