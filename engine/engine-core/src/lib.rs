//! Core traits and types for the Tessera game engine
//!
//! This crate defines the contract between games and the search:
//! - `Game`: legality, transitions, terminal detection, canonical form and keys
//! - `Player` / `Outcome`: two-player, zero-sum perspective handling
//! - `StateKey`: stable identifier of a canonical position
//! - `game_utils`: helpers shared by the bundled board games

pub mod game;
pub mod game_utils;
pub mod player;
pub mod state_key;

// Re-export main types for convenience
pub use game::{Action, Game, GameError};
pub use player::{Outcome, Player};
pub use state_key::StateKey;
