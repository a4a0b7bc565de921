//! Game trait consumed by the search engine.
//!
//! The search never looks inside a position. Everything it needs (legality,
//! terminal detection, transitions, perspective changes and keys) goes
//! through this trait.
//!
//! # Canonical form
//!
//! Positions handed to the search are always in canonical form: transformed
//! so that the player to move is seen as [`Player::First`]. After applying an
//! action the game reports who moves next, and the caller converts the new
//! position with [`Game::canonical_form`] before searching it.
//!
//! # Example
//!
//! ```rust
//! # use engine_core::{Action, Game, GameError, Outcome, Player, StateKey};
//! #[derive(Debug)]
//! struct Nim;
//!
//! impl Game for Nim {
//!     // Stones left; taking the last stone wins.
//!     type Position = u8;
//!     type Move = u8;
//!
//!     fn name(&self) -> &'static str { "nim" }
//!     fn action_size(&self) -> usize { 2 }
//!     fn initial_position(&self) -> u8 { 5 }
//!     fn canonical_form(&self, position: &u8, _to_move: Player) -> u8 { *position }
//!     fn legal_action_mask(&self, position: &u8) -> Vec<bool> {
//!         vec![*position >= 1, *position >= 2]
//!     }
//!     fn terminal_outcome(&self, position: &u8, _reference: Player) -> Option<Outcome> {
//!         // The player to move faces an empty pile: the opponent took the last stone.
//!         (*position == 0).then_some(Outcome::Loss)
//!     }
//!     fn decode_action(&self, action: Action) -> Result<u8, GameError> {
//!         if action < 2 {
//!             Ok(action as u8 + 1)
//!         } else {
//!             Err(GameError::InvalidAction { action, action_size: 2 })
//!         }
//!     }
//!     fn apply_move(&self, position: &u8, take: u8) -> Result<(u8, Player), GameError> {
//!         if take > *position {
//!             return Err(GameError::IllegalMove { action: take as usize - 1 });
//!         }
//!         Ok((position - take, Player::Second))
//!     }
//!     fn state_key(&self, position: &u8) -> StateKey {
//!         StateKey::from(vec![*position])
//!     }
//! }
//!
//! let game = Nim;
//! let (next, to_move) = game.apply_action(&5, 1).unwrap();
//! assert_eq!(next, 3);
//! assert_eq!(game.canonical_form(&next, to_move), 3);
//! ```

use std::fmt::Debug;

use thiserror::Error;

use crate::player::{Outcome, Player};
use crate::state_key::StateKey;

/// Index into the game-wide action space, in `[0, action_size)`.
pub type Action = usize;

/// Errors raised by game implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Action {action} is outside the action space of size {action_size}")]
    InvalidAction { action: Action, action_size: usize },

    #[error("Action {action} is not legal in this position")]
    IllegalMove { action: Action },

    #[error("Invalid move list: {0}")]
    InvalidMoveList(String),
}

/// Two-player, zero-sum, perfect-information game.
pub trait Game: Send + Sync + Debug {
    /// Game position. Cloned once per ply during a simulation.
    type Position: Clone + Debug + Send + Sync;

    /// Engine-internal move representation decoded from an [`Action`].
    type Move: Copy + Debug;

    /// Short identifier, e.g. `"tictactoe"`.
    fn name(&self) -> &'static str;

    /// Size of the fixed, enumerable action space.
    fn action_size(&self) -> usize;

    /// Starting position, with [`Player::First`] to move.
    fn initial_position(&self) -> Self::Position;

    /// View `position` from the perspective of `to_move`.
    fn canonical_form(&self, position: &Self::Position, to_move: Player) -> Self::Position;

    /// Legality indicator for every action; length is [`Game::action_size`].
    fn legal_action_mask(&self, position: &Self::Position) -> Vec<bool>;

    /// `None` while the game continues, otherwise the result from
    /// `reference`'s perspective.
    ///
    /// Implementations must guarantee that every sequence of legal moves
    /// eventually reaches a terminal position (e.g. by repetition rules);
    /// the search has no depth limit of its own.
    fn terminal_outcome(&self, position: &Self::Position, reference: Player) -> Option<Outcome>;

    /// Decode an action index into a move.
    fn decode_action(&self, action: Action) -> Result<Self::Move, GameError>;

    /// Apply a move, returning the next position and the player to move there.
    ///
    /// The search assumes turns alternate on every move and negates values
    /// once per ply.
    fn apply_move(
        &self,
        position: &Self::Position,
        mv: Self::Move,
    ) -> Result<(Self::Position, Player), GameError>;

    /// Stable key of a (canonical) position.
    fn state_key(&self, position: &Self::Position) -> StateKey;

    /// Decode and apply an action in one step.
    fn apply_action(
        &self,
        position: &Self::Position,
        action: Action,
    ) -> Result<(Self::Position, Player), GameError> {
        let mv = self.decode_action(action)?;
        self.apply_move(position, mv)
    }
}
