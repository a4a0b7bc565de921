//! Evaluator trait for position evaluation.
//!
//! The evaluator provides policy (action probabilities) and value estimates
//! for game positions. In AlphaZero, this is a neural network. The search
//! treats it as a pure function and always masks and renormalises the policy
//! itself, so evaluators are free to put mass on illegal actions.

use std::sync::Mutex;

use engine_core::Game;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Model error: {0}")]
    ModelError(String),
}

/// Result of evaluating a game position.
#[derive(Debug, Clone)]
pub struct EvalResult {
    /// Policy: one entry per action in the game's action space.
    /// Need not be masked or normalised.
    pub policy: Vec<f32>,

    /// Value estimate for the player to move.
    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f32,
}

/// Trait for position evaluators.
///
/// Implementations could be:
/// - UniformEvaluator: Returns uniform policy (for testing)
/// - RandomEvaluator: Seeded random policy and value (for reproducibility tests)
/// - A neural network wrapper
pub trait Evaluator<G: Game>: Send + Sync {
    /// Evaluate a single canonical position.
    fn evaluate(&self, game: &G, position: &G::Position) -> Result<EvalResult, EvaluatorError>;
}

impl<G: Game, E: Evaluator<G> + ?Sized> Evaluator<G> for &E {
    fn evaluate(&self, game: &G, position: &G::Position) -> Result<EvalResult, EvaluatorError> {
        (**self).evaluate(game, position)
    }
}

/// Uniform evaluator that assigns equal probability to every action.
/// Value is always 0.0 (neutral). Useful for testing MCTS without a model.
#[derive(Debug, Clone, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Game> Evaluator<G> for UniformEvaluator {
    fn evaluate(&self, game: &G, _position: &G::Position) -> Result<EvalResult, EvaluatorError> {
        let num_actions = game.action_size();
        if num_actions == 0 {
            return Err(EvaluatorError::InvalidState(
                "game has an empty action space".to_string(),
            ));
        }

        Ok(EvalResult {
            policy: vec![1.0 / num_actions as f32; num_actions],
            value: 0.0,
        })
    }
}

/// Seeded evaluator returning random policies and values.
///
/// Output depends only on the seed and the number of previous calls, so two
/// searches driven the same way see identical evaluations.
#[derive(Debug)]
pub struct RandomEvaluator {
    rng: Mutex<ChaCha20Rng>,
}

impl RandomEvaluator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl<G: Game> Evaluator<G> for RandomEvaluator {
    fn evaluate(&self, game: &G, _position: &G::Position) -> Result<EvalResult, EvaluatorError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| EvaluatorError::EvaluationFailed(e.to_string()))?;

        let policy = (0..game.action_size()).map(|_| rng.gen::<f32>()).collect();
        let value = rng.gen_range(-1.0f32..=1.0);

        Ok(EvalResult { policy, value })
    }
}

/// Adapter turning a closure into an evaluator.
///
/// ```rust
/// use engine_core::Game;
/// use games_tictactoe::{State, TicTacToe};
/// use mcts::{EvalResult, Evaluator, EvaluatorError, FnEvaluator};
///
/// let center_lover = FnEvaluator(|_: &TicTacToe, _: &State| -> Result<EvalResult, EvaluatorError> {
///     let mut policy = vec![0.0; 9];
///     policy[4] = 1.0;
///     Ok(EvalResult { policy, value: 0.1 })
/// });
/// let game = TicTacToe::new();
/// let result = center_lover.evaluate(&game, &game.initial_position()).unwrap();
/// assert_eq!(result.policy[4], 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FnEvaluator<F>(pub F);

impl<G, F> Evaluator<G> for FnEvaluator<F>
where
    G: Game,
    F: Fn(&G, &G::Position) -> Result<EvalResult, EvaluatorError> + Send + Sync,
{
    fn evaluate(&self, game: &G, position: &G::Position) -> Result<EvalResult, EvaluatorError> {
        (self.0)(game, position)
    }
}
