//! MCTS search implementation.
//!
//! Each simulation walks from the root to a leaf and then backs up:
//! 1. Selection: at every expanded state pick the legal action with the
//!    highest upper confidence bound, apply it and canonicalise the result
//! 2. Expansion: at the first unseen state, query the evaluator, mask its
//!    policy to the legal actions and store it as the prior
//! 3. Backpropagation: fold the leaf value into every edge on the path,
//!    deepest first, negating once per ply
//!
//! The walk is an explicit loop over a path of `(StateKey, Action)` pairs, so
//! long games cannot exhaust the call stack.
//!
//! # Value convention
//!
//! A leaf value is always the expected outcome for the player to move at the
//! leaf. The edge `(s, a)` stores values from the perspective of the player to
//! move at `s`, i.e. the negation of the value of the child reached by `a`.

use std::time::Instant;

use engine_core::game_utils::count_legal;
use engine_core::{Action, Game, GameError, Player, StateKey};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, MctsConfig};
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::policy::{first_argmax, root_visits, visits_to_policy, PolicyError};
use crate::store::{EdgeStats, StatsStore, StoreError};

/// Added to the state visit count in the exploration term of unvisited
/// edges, so the prior still ranks actions at a state's first selection.
pub const UCB_EPSILON: f32 = 1e-8;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Game error: {0}")]
    GameError(#[from] GameError),

    #[error("Evaluator error: {0}")]
    EvaluatorError(#[from] EvaluatorError),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Policy error: {0}")]
    PolicyError(#[from] PolicyError),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("No legal moves available in non-terminal state {0}")]
    NoLegalMoves(StateKey),

    #[error("Evaluator returned a policy of length {actual}, expected {expected}")]
    PolicyLength { expected: usize, actual: usize },

    #[error("Legal action mask has length {actual}, expected {expected}")]
    MaskLength { expected: usize, actual: usize },

    #[error("Cannot search from a terminal position")]
    TerminalRoot,
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Completed simulations.
    pub simulations: u32,
    /// States expanded (evaluator calls).
    pub expansions: u32,
    /// Simulations that ended in a terminal position.
    pub terminal_hits: u32,
    /// Expansions where the evaluator put no mass on any legal action.
    pub degenerate_masks: u32,
    /// Evaluator values outside [-1, 1] that were clamped.
    pub clamped_values: u32,
    /// Longest selection path, in plies.
    pub max_depth: u32,
}

/// Result of a complete search from one root.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Greedy action: most visited at the root, lowest index on ties.
    pub action: Action,

    /// Action probabilities after applying the temperature.
    pub policy: Vec<f32>,

    /// Root visit counts per action.
    pub visits: Vec<u32>,

    /// Visit-weighted mean of root edge values, for the player to move.
    pub root_value: f32,

    /// Search counters.
    pub stats: SearchStats,
}

/// Upper confidence bound of one edge.
///
/// Traversed edges score `Q + c * sqrt(Ns / Nsa)`; untraversed edges score
/// `c * P * sqrt(Ns + eps)`.
#[inline]
pub fn upper_confidence_bound(
    edge: Option<&EdgeStats>,
    prior: f32,
    state_visits: u32,
    c_puct: f32,
) -> f32 {
    let n_s = state_visits as f32;
    match edge {
        Some(edge) => edge.action_value + c_puct * (n_s / edge.visit_count as f32).sqrt(),
        None => c_puct * prior * (n_s + UCB_EPSILON).sqrt(),
    }
}

/// MCTS search state.
///
/// Borrows the session's [`StatsStore`]; statistics accumulate across calls
/// and across searches that share the store.
pub struct MctsSearch<'a, G: Game, E: Evaluator<G>> {
    game: &'a G,
    evaluator: &'a E,
    store: &'a mut StatsStore,
    config: MctsConfig,
    stats: SearchStats,
}

impl<'a, G: Game, E: Evaluator<G>> MctsSearch<'a, G, E> {
    /// Create a search over `store` with the given configuration.
    pub fn new(
        game: &'a G,
        evaluator: &'a E,
        store: &'a mut StatsStore,
        config: MctsConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;

        Ok(Self {
            game,
            evaluator,
            store,
            config,
            stats: SearchStats::default(),
        })
    }

    /// Run one simulation from `root` (a canonical position).
    ///
    /// Returns the value backed up for the player to move at `root`. A
    /// terminal root returns its outcome without touching the statistics.
    ///
    /// The sign follows the module's value convention: a recursive search
    /// that returns `-value` to its caller would report the negation of this.
    pub fn simulate(&mut self, root: &G::Position) -> Result<f32, SearchError> {
        let mut path: Vec<(StateKey, Action)> = Vec::new();
        let mut position = root.clone();

        let leaf_value = loop {
            if let Some(outcome) = self.game.terminal_outcome(&position, Player::First) {
                self.stats.terminal_hits += 1;
                break outcome.value();
            }

            let key = self.game.state_key(&position);
            if !self.store.has_state(&key) {
                break self.expand(key, &position)?;
            }

            let mask = self.legal_mask(&position)?;
            let action = self.select_action(&key, &mask)?;
            let (next, to_move) = self.game.apply_action(&position, action)?;
            position = self.game.canonical_form(&next, to_move);
            path.push((key, action));
        };

        let mut value = leaf_value;
        for (key, action) in path.iter().rev() {
            value = -value;
            self.store.record_backup(key, *action, value)?;
        }

        self.stats.simulations += 1;
        self.stats.max_depth = self.stats.max_depth.max(path.len() as u32);

        trace!(
            depth = path.len(),
            leaf_value,
            root_value = value,
            "MCTS simulation complete"
        );

        Ok(value)
    }

    /// Run `budget` simulations from `root`.
    pub fn run(&mut self, root: &G::Position, budget: u32) -> Result<u32, SearchError> {
        self.run_until(root, budget, None)
    }

    /// Run up to `budget` simulations, stopping early once `deadline` has
    /// passed. The deadline is only checked between simulations.
    ///
    /// Returns the number of simulations actually run.
    pub fn run_until(
        &mut self,
        root: &G::Position,
        budget: u32,
        deadline: Option<Instant>,
    ) -> Result<u32, SearchError> {
        for completed in 0..budget {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                debug!(completed, budget, "MCTS deadline reached");
                return Ok(completed);
            }
            self.simulate(root)?;
        }
        Ok(budget)
    }

    /// Run the configured number of simulations and return the root policy.
    pub fn get_action_probabilities(
        &mut self,
        root: &G::Position,
        temperature: f32,
    ) -> Result<Vec<f32>, SearchError> {
        self.get_action_probabilities_with(root, self.config.num_simulations, temperature)
    }

    /// Run `budget` simulations from `root` and convert the root visit
    /// counts into action probabilities.
    pub fn get_action_probabilities_with(
        &mut self,
        root: &G::Position,
        budget: u32,
        temperature: f32,
    ) -> Result<Vec<f32>, SearchError> {
        if self.game.terminal_outcome(root, Player::First).is_some() {
            return Err(SearchError::TerminalRoot);
        }

        self.run(root, budget)?;

        let visits = self.root_visits(root);
        let policy = visits_to_policy(&visits, temperature)?;

        debug!(
            game = self.game.name(),
            budget,
            temperature,
            states = self.store.len(),
            expansions = self.stats.expansions,
            degenerate_masks = self.stats.degenerate_masks,
            clamped_values = self.stats.clamped_values,
            max_depth = self.stats.max_depth,
            "MCTS search complete"
        );

        Ok(policy)
    }

    /// Root visit counts per action.
    pub fn root_visits(&self, root: &G::Position) -> Vec<u32> {
        let key = self.game.state_key(root);
        root_visits(&*self.store, &key, self.game.action_size())
    }

    /// Upper confidence bound of `action` at the expanded state `key`.
    pub fn ucb_score(&self, key: &StateKey, action: Action) -> Result<f32, SearchError> {
        let prior = self.store.prior(key, action)?;
        Ok(upper_confidence_bound(
            self.store.edge(key, action),
            prior,
            self.store.state_visits(key),
            self.config.c_puct,
        ))
    }

    /// Legal action with the highest upper confidence bound.
    ///
    /// Actions are scanned in ascending order and only a strictly greater
    /// score replaces the current best, so ties go to the lowest index.
    pub fn select_action(&self, key: &StateKey, legal: &[bool]) -> Result<Action, SearchError> {
        let mut best: Option<(Action, f32)> = None;

        for (action, &is_legal) in legal.iter().enumerate() {
            if !is_legal {
                continue;
            }
            let score = self.ucb_score(key, action)?;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((action, score)),
            }
        }

        best.map(|(action, _)| action)
            .ok_or_else(|| SearchError::NoLegalMoves(key.clone()))
    }

    /// Evaluate an unseen state and record its masked prior.
    ///
    /// Returns the evaluator's value for the player to move at `position`.
    fn expand(&mut self, key: StateKey, position: &G::Position) -> Result<f32, SearchError> {
        let action_size = self.game.action_size();
        let eval = self.evaluator.evaluate(self.game, position)?;
        if eval.policy.len() != action_size {
            return Err(SearchError::PolicyLength {
                expected: action_size,
                actual: eval.policy.len(),
            });
        }

        let mask = self.legal_mask(position)?;
        let mut prior: Vec<f32> = eval
            .policy
            .iter()
            .zip(&mask)
            .map(|(&p, &is_legal)| if is_legal { p } else { 0.0 })
            .collect();

        let sum: f32 = prior.iter().sum();
        if sum > 0.0 {
            for p in &mut prior {
                *p /= sum;
            }
        } else {
            let num_legal = count_legal(&mask);
            if num_legal == 0 {
                return Err(SearchError::NoLegalMoves(key));
            }

            warn!(
                state = %key,
                num_legal,
                "Evaluator policy is zero on every legal move, using uniform prior"
            );
            self.stats.degenerate_masks += 1;

            let uniform = 1.0 / num_legal as f32;
            prior = mask
                .iter()
                .map(|&is_legal| if is_legal { uniform } else { 0.0 })
                .collect();
        }

        let value = eval.value.clamp(-1.0, 1.0);
        if value != eval.value {
            warn!(
                state = %key,
                value = eval.value,
                "Evaluator value outside [-1, 1], clamping"
            );
            self.stats.clamped_values += 1;
        }

        self.store.record_expansion(key, prior)?;
        self.stats.expansions += 1;

        Ok(value)
    }

    fn legal_mask(&self, position: &G::Position) -> Result<Vec<bool>, SearchError> {
        let mask = self.game.legal_action_mask(position);
        if mask.len() != self.game.action_size() {
            return Err(SearchError::MaskLength {
                expected: self.game.action_size(),
                actual: mask.len(),
            });
        }
        Ok(mask)
    }

    /// Counters collected so far by this search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// The session statistics (for inspection/debugging).
    pub fn store(&self) -> &StatsStore {
        &*self.store
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

/// Convenience function to run a single MCTS search with a fresh store.
///
/// Uses `config.num_simulations` and `config.temperature`. Fails with
/// [`SearchError::TerminalRoot`] when `root` is already decided.
pub fn run_mcts<G: Game, E: Evaluator<G>>(
    game: &G,
    evaluator: &E,
    config: MctsConfig,
    root: &G::Position,
) -> Result<SearchResult, SearchError> {
    let mut store = StatsStore::new();
    run_mcts_with_store(game, evaluator, config, root, &mut store, None)
}

/// Run a search over a caller-owned store, optionally bounded by a deadline.
pub fn run_mcts_with_store<G: Game, E: Evaluator<G>>(
    game: &G,
    evaluator: &E,
    config: MctsConfig,
    root: &G::Position,
    store: &mut StatsStore,
    deadline: Option<Instant>,
) -> Result<SearchResult, SearchError> {
    if game.terminal_outcome(root, Player::First).is_some() {
        return Err(SearchError::TerminalRoot);
    }

    let temperature = config.temperature;
    let budget = config.num_simulations;
    let mut search = MctsSearch::new(game, evaluator, store, config)?;
    search.run_until(root, budget, deadline)?;

    let visits = search.root_visits(root);
    let policy = visits_to_policy(&visits, temperature)?;
    let key = game.state_key(root);
    let action = first_argmax(&visits).ok_or_else(|| SearchError::NoLegalMoves(key.clone()))?;

    let (weighted, total) = search
        .store()
        .edges(&key)
        .fold((0.0f32, 0u32), |(sum, n), (_, edge)| {
            (sum + edge.action_value * edge.visit_count as f32, n + edge.visit_count)
        });
    let root_value = if total > 0 { weighted / total as f32 } else { 0.0 };

    Ok(SearchResult {
        action,
        policy,
        visits,
        root_value,
        stats: search.stats(),
    })
}
