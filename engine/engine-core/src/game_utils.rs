//! Shared utilities for two-player game implementations
//!
//! This module provides common functionality used across multiple game implementations
//! to reduce code duplication and ensure consistent behavior.

use crate::game::{Action, Game, GameError};
use crate::player::{Outcome, Player};

/// Winner indicator used by the bundled board games.
pub mod winner {
    pub const NONE: u8 = 0;
    pub const FIRST: u8 = 1;
    pub const SECOND: u8 = 2;
    pub const DRAW: u8 = 3;
}

/// Translate a winner indicator into an outcome for `reference`.
///
/// # Arguments
/// * `code` - Winner indicator: 0=ongoing, 1=player1 wins, 2=player2 wins, 3=draw
/// * `reference` - The player whose perspective the outcome is reported from
///
/// # Example
/// ```
/// use engine_core::game_utils::outcome_for;
/// use engine_core::{Outcome, Player};
///
/// assert_eq!(outcome_for(1, Player::First), Some(Outcome::Win));
/// assert_eq!(outcome_for(1, Player::Second), Some(Outcome::Loss));
/// assert_eq!(outcome_for(3, Player::First), Some(Outcome::Draw));
/// assert_eq!(outcome_for(0, Player::First), None);
/// ```
#[inline]
pub fn outcome_for(code: u8, reference: Player) -> Option<Outcome> {
    match code {
        winner::FIRST | winner::SECOND => {
            if code == reference.label() {
                Some(Outcome::Win)
            } else {
                Some(Outcome::Loss)
            }
        }
        winner::DRAW => Some(Outcome::Draw),
        _ => None,
    }
}

/// Swap player labels 1 <-> 2 in a board, leaving empty cells alone.
pub fn swap_labels(board: &mut [u8]) {
    for cell in board.iter_mut() {
        *cell = match *cell {
            1 => 2,
            2 => 1,
            other => other,
        };
    }
}

/// Expand a bit mask into a legality vector of `len` entries.
pub fn mask_from_bits(bits: u64, len: usize) -> Vec<bool> {
    (0..len).map(|i| (bits >> i) & 1 == 1).collect()
}

/// Number of legal actions in a mask.
#[inline]
pub fn count_legal(mask: &[bool]) -> usize {
    mask.iter().filter(|&&legal| legal).count()
}

/// Play `actions` from the initial position, canonicalising after every move.
///
/// Returns the canonical position reached and the absolute player to move
/// there. Fails if an action is illegal or the game ends before the list does.
pub fn play_actions<G: Game>(
    game: &G,
    actions: &[Action],
) -> Result<(G::Position, Player), GameError> {
    let mut position = game.initial_position();
    let mut to_move = Player::First;

    for (ply, &action) in actions.iter().enumerate() {
        if game.terminal_outcome(&position, Player::First).is_some() {
            return Err(GameError::InvalidMoveList(format!(
                "game is over after {} moves",
                ply
            )));
        }
        let legal = game.legal_action_mask(&position);
        if !legal.get(action).copied().unwrap_or(false) {
            return Err(GameError::IllegalMove { action });
        }

        let (next, next_relative) = game.apply_action(&position, action)?;
        // `next_relative` is relative to the canonical frame, in which the
        // mover is always the first player.
        if next_relative == Player::Second {
            to_move = to_move.opponent();
        }
        position = game.canonical_form(&next, next_relative);
    }

    Ok((position, to_move))
}
