//! Monte Carlo Tree Search (MCTS) over a transposition-keyed statistics store.
//!
//! This crate provides a game-agnostic UCT search guided by a policy/value
//! [`Evaluator`]. It works with any game implementing the `engine-core`
//! [`Game`](engine_core::Game) trait.
//!
//! # Overview
//!
//! Each simulation walks from the root until it reaches a terminal position
//! or a position it has never seen:
//!
//! 1. **Selection**: at every expanded state pick the legal action with the
//!    highest upper confidence bound
//! 2. **Expansion**: evaluate the unseen state and store its masked prior
//! 3. **Backpropagation**: fold the leaf value into every edge on the path,
//!    negating once per ply
//!
//! Statistics are keyed by [`StateKey`](engine_core::StateKey), so two move
//! orders reaching the same position share one entry.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use games_tictactoe::TicTacToe;
//! use mcts::{run_mcts, MctsConfig, UniformEvaluator};
//!
//! let game = TicTacToe::new();
//! let root = game.initial_position();
//!
//! let config = MctsConfig::for_testing().with_simulations(64);
//! let result = run_mcts(&game, &UniformEvaluator::new(), config, &root).unwrap();
//!
//! assert_eq!(result.policy.len(), 9);
//! assert_eq!(result.visits.iter().sum::<u32>(), 63);
//! println!("Best action: {}", result.action);
//! ```
//!
//! For repeated searches from the same position, keep a [`StatsStore`] and
//! drive an [`MctsSearch`] directly:
//!
//! ```rust
//! use engine_core::Game;
//! use games_tictactoe::TicTacToe;
//! use mcts::{MctsConfig, MctsSearch, RandomEvaluator, StatsStore};
//!
//! let game = TicTacToe::new();
//! let evaluator = RandomEvaluator::new(42);
//! let mut store = StatsStore::new();
//! let root = game.initial_position();
//!
//! let mut search = MctsSearch::new(&game, &evaluator, &mut store, MctsConfig::default()).unwrap();
//! let probs = search.get_action_probabilities(&root, 1.0).unwrap();
//! assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-5);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Number of simulations per search (default: 30)
//! - `c_puct`: Exploration constant for UCB (default: 1.0)
//! - `temperature`: Temperature for action selection (1.0 = proportional, 0.0 = greedy)
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------+
//! |                      MctsSearch                       |
//! |   +------------+   +------------+   +-------------+   |
//! |   | StatsStore |   |    Game    |   |  Evaluator  |   |
//! |   | (N, Q, P)  |   | (rules)    |   | (policy/v)  |   |
//! |   +------------+   +------------+   +-------------+   |
//! |          select -> expand -> backpropagate            |
//! +-------------------------------------------------------+
//!                           |
//!                           v
//!             policy::visits_to_policy (root)
//! ```

pub mod config;
pub mod evaluator;
pub mod policy;
pub mod search;
pub mod store;

// Re-export main types
pub use config::{ConfigError, MctsConfig};
pub use evaluator::{
    EvalResult, Evaluator, EvaluatorError, FnEvaluator, RandomEvaluator, UniformEvaluator,
};
pub use policy::{first_argmax, root_visits, sample_action, visits_to_policy, PolicyError};
pub use search::{
    run_mcts, run_mcts_with_store, upper_confidence_bound, MctsSearch, SearchError, SearchResult,
    SearchStats, UCB_EPSILON,
};
pub use store::{EdgeStats, StateStats, StatsStore, StoreError, StoreStats};
