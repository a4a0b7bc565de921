//! Configuration for the analyzer
//!
//! Defaults come from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_config::{load_config_with_source, CentralConfig, ConfigSource};
use engine_core::Action;
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Games the analyzer can load.
pub const SUPPORTED_GAMES: &[&str] = &["tictactoe", "connect4"];

/// Evaluators selectable with `--evaluator`.
pub const SUPPORTED_EVALUATORS: &[&str] = &["uniform", "random"];

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<(CentralConfig, ConfigSource)> = Lazy::new(load_config_with_source);

fn central() -> &'static CentralConfig {
    &CENTRAL_CONFIG.0
}

/// Where the defaults for this run were loaded from.
pub fn config_source() -> &'static ConfigSource {
    &CENTRAL_CONFIG.1
}

// Default value functions that read from central config
fn default_game() -> String {
    central().common.env_id.clone()
}

fn default_log_level() -> String {
    central().common.log_level.clone()
}

fn default_num_simulations() -> u32 {
    central().mcts.num_simulations
}

fn default_c_puct() -> f32 {
    central().mcts.c_puct
}

fn default_temperature() -> f32 {
    central().mcts.temperature
}

#[derive(Parser, Debug, Clone)]
#[command(name = "analyzer")]
#[command(about = "Tessera analyzer - MCTS action probabilities for a position")]
#[command(
    long_about = "Replays a move list from the initial position, runs a Monte Carlo
tree search from the resulting position and prints per-action statistics.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Game to analyze (tictactoe, connect4)
    #[arg(long, default_value_t = default_game())]
    pub game: String,

    /// Comma-separated actions leading to the position (e.g. 0,4,1)
    #[arg(long, default_value = "")]
    pub moves: String,

    /// Number of MCTS simulations
    #[arg(long, default_value_t = default_num_simulations())]
    pub simulations: u32,

    /// Temperature applied to root visit counts (0 = greedy)
    #[arg(long, default_value_t = default_temperature())]
    pub temperature: f32,

    /// Exploration constant
    #[arg(long, default_value_t = default_c_puct())]
    pub c_puct: f32,

    /// Seed for the random evaluator and for --sample
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Position evaluator (uniform, random)
    #[arg(long, default_value = "uniform")]
    pub evaluator: String,

    /// Stop searching after this many milliseconds (checked between simulations)
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Sample the reported action from the policy instead of taking the most visited
    #[arg(long)]
    pub sample: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_GAMES.contains(&self.game.as_str()) {
            return Err(anyhow!(
                "unknown game '{}', expected one of {}",
                self.game,
                SUPPORTED_GAMES.join(", ")
            ));
        }

        if !SUPPORTED_EVALUATORS.contains(&self.evaluator.as_str()) {
            return Err(anyhow!(
                "unknown evaluator '{}', expected one of {}",
                self.evaluator,
                SUPPORTED_EVALUATORS.join(", ")
            ));
        }

        if self.simulations == 0 {
            return Err(anyhow!("simulations must be greater than 0"));
        }

        if self.time_limit_ms == Some(0) {
            return Err(anyhow!("time_limit_ms must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.mcts_config().validate()?;
        self.parse_moves()?;

        Ok(())
    }

    /// Search parameters for this run.
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_simulations(self.simulations)
            .with_c_puct(self.c_puct)
            .with_temperature(self.temperature)
    }

    /// The move list as actions. An empty string is the initial position.
    pub fn parse_moves(&self) -> Result<Vec<Action>> {
        self.moves
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(|m| {
                m.parse::<Action>()
                    .with_context(|| format!("invalid move '{}' in --moves", m))
            })
            .collect()
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}
