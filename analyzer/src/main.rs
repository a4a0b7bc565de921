//! Analyzer - MCTS position analysis for Tessera games
//!
//! A one-shot command-line tool that:
//! 1. Replays a move list from the initial position
//! 2. Runs a Monte Carlo tree search from the resulting position
//! 3. Prints visits, values, priors and probabilities for every legal action

use anyhow::Result;
use clap::Parser;
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use tracing::{error, info};

mod analysis;
mod config;

use crate::analysis::analyze;
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(
        config_source = %config::config_source(),
        game = %config.game,
        moves = %config.moves,
        simulations = config.simulations,
        c_puct = config.c_puct,
        temperature = config.temperature,
        evaluator = %config.evaluator,
        "Starting analysis"
    );

    let analysis = match config.game.as_str() {
        "connect4" => analyze(&Connect4::new(), &config),
        _ => analyze(&TicTacToe::new(), &config),
    };

    match analysis {
        Ok(analysis) => {
            println!("{}", analysis);
            Ok(())
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            Err(e)
        }
    }
}
