//! Position analysis: replay a move list, search, and collect per-action
//! statistics for display.

use std::fmt;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use engine_core::game_utils::play_actions;
use engine_core::{Action, Game, Player};
use mcts::{
    run_mcts_with_store, sample_action, Evaluator, RandomEvaluator, SearchStats, StatsStore,
    UniformEvaluator,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::config::Config;

/// Statistics of one legal root action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub action: Action,
    pub visits: u32,
    /// Mean value for the player to move; `None` if never traversed.
    pub q: Option<f32>,
    pub prior: f32,
    pub probability: f32,
}

/// Outcome of analyzing one position.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub game: &'static str,
    pub to_move: Player,
    pub board: String,
    pub actions: Vec<ActionReport>,
    pub chosen: Action,
    pub sampled: bool,
    pub root_value: f32,
    pub stats: SearchStats,
    pub states: usize,
}

/// Analyze the position reached by `config.moves` in `game`.
pub fn analyze<G>(game: &G, config: &Config) -> Result<Analysis>
where
    G: Game,
    G::Position: fmt::Display,
{
    match config.evaluator.as_str() {
        "random" => analyze_with(game, &RandomEvaluator::new(config.seed), config),
        _ => analyze_with(game, &UniformEvaluator::new(), config),
    }
}

fn analyze_with<G, E>(game: &G, evaluator: &E, config: &Config) -> Result<Analysis>
where
    G: Game,
    G::Position: fmt::Display,
    E: Evaluator<G>,
{
    let moves = config.parse_moves()?;
    let (root, to_move) = play_actions(game, &moves)
        .with_context(|| format!("failed to replay moves {:?} in {}", moves, game.name()))?;

    if let Some(outcome) = game.terminal_outcome(&root, Player::First) {
        bail!(
            "position after {:?} is already decided ({:?} for {})",
            moves,
            outcome,
            to_move
        );
    }

    let deadline = config.time_limit().map(|limit| Instant::now() + limit);
    let mut store = StatsStore::new();
    let started = Instant::now();
    let result = run_mcts_with_store(
        game,
        evaluator,
        config.mcts_config(),
        &root,
        &mut store,
        deadline,
    )
    .context("search failed")?;

    let key = game.state_key(&root);
    if store.state_visits(&key) == 0 {
        bail!(
            "search stopped after {} simulation(s), before any root action was tried; \
             raise --time-limit-ms or --simulations",
            result.stats.simulations
        );
    }

    info!(
        game = game.name(),
        simulations = result.stats.simulations,
        states = store.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Search finished"
    );

    let chosen = if config.sample {
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
        sample_action(&result.policy, &mut rng).context("failed to sample an action")?
    } else {
        result.action
    };
    debug!(chosen, sampled = config.sample, "Action chosen");

    let mask = game.legal_action_mask(&root);
    let mut actions = Vec::new();
    for (action, &is_legal) in mask.iter().enumerate() {
        if !is_legal {
            continue;
        }
        actions.push(ActionReport {
            action,
            visits: result.visits[action],
            q: store.edge_value(&key, action),
            prior: store.prior(&key, action)?,
            probability: result.policy[action],
        });
    }

    // Canonical positions are relative to the mover; undo that for display.
    let board = game.canonical_form(&root, to_move).to_string();

    Ok(Analysis {
        game: game.name(),
        to_move,
        board,
        actions,
        chosen,
        sampled: config.sample,
        root_value: result.root_value,
        stats: result.stats,
        states: store.len(),
    })
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {} to move", self.game, self.to_move)?;
        writeln!(f)?;
        write!(f, "{}", self.board)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>6} {:>8} {:>8} {:>8} {:>8}",
            "action", "visits", "q", "prior", "prob"
        )?;
        for report in &self.actions {
            let q = report
                .q
                .map_or_else(|| "-".to_string(), |q| format!("{:+.3}", q));
            writeln!(
                f,
                "{:>6} {:>8} {:>8} {:>8.3} {:>8.3}",
                report.action, report.visits, q, report.prior, report.probability
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "simulations: {}  states: {}  max depth: {}  value: {:+.3}",
            self.stats.simulations, self.states, self.stats.max_depth, self.root_value
        )?;
        let how = if self.sampled { "sampled" } else { "best" };
        write!(f, "{} action: {}", how, self.chosen)
    }
}
