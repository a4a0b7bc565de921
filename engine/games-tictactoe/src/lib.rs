//! TicTacToe game implementation for the Tessera engine
//!
//! This crate provides a small, complete reference implementation of the
//! `Game` trait. Its game tree is tiny, which makes it the default fixture for
//! search tests and benchmarks.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Game, Player};
//! use games_tictactoe::TicTacToe;
//!
//! let game = TicTacToe::new();
//! let start = game.initial_position();
//! let (next, to_move) = game.apply_action(&start, 4).unwrap();
//! let canonical = game.canonical_form(&next, to_move);
//! assert_eq!(to_move, Player::Second);
//! assert!(!game.legal_action_mask(&canonical)[4]);
//! ```

use std::fmt;

use engine_core::game_utils::{mask_from_bits, outcome_for, swap_labels, winner};
use engine_core::{Action, Game, GameError, Outcome, Player, StateKey};

/// Number of board cells, which is also the size of the action space.
pub const NUM_ACTIONS: usize = 9;

/// TicTacToe game state
///
/// Represents the complete state of a TicTacToe game including the board,
/// current player, and winner information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    /// Board representation: 0=empty, 1=X, 2=O
    board: [u8; 9],
    /// Current player: 1=X, 2=O
    current_player: u8,
    /// Winner: 0=none/ongoing, 1=X, 2=O, 3=draw
    winner: u8,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [0; 9],
            current_player: 1, // X goes first
            winner: winner::NONE,
        }
    }

    /// Build a state from a board, deriving the side to move and the winner.
    ///
    /// Returns `None` if the piece counts cannot arise in a real game.
    pub fn from_board(board: [u8; 9]) -> Option<Self> {
        if board.iter().any(|&cell| cell > 2) {
            return None;
        }
        let xs = board.iter().filter(|&&c| c == 1).count();
        let os = board.iter().filter(|&&c| c == 2).count();
        let current_player = match xs.checked_sub(os) {
            Some(0) => 1,
            Some(1) => 2,
            _ => return None,
        };
        Some(Self {
            board,
            current_player,
            winner: Self::check_winner(&board),
        })
    }

    pub fn board(&self) -> &[u8; 9] {
        &self.board
    }

    pub fn current_player(&self) -> u8 {
        self.current_player
    }

    pub fn winner(&self) -> u8 {
        self.winner
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner != winner::NONE
    }

    /// Get legal moves (empty positions)
    pub fn legal_moves(&self) -> Vec<u8> {
        if self.is_done() {
            return Vec::new();
        }

        (0..9u8)
            .filter(|&pos| self.board[pos as usize] == 0)
            .collect()
    }

    /// Bit-mask representation of legal moves.
    ///
    /// Bits 0-8 correspond to board positions 0-8. A bit set to 1 indicates the
    /// position is currently legal. When the game is finished the mask is zeroed.
    pub fn legal_moves_mask(&self) -> u16 {
        if self.is_done() {
            return 0;
        }

        self.board
            .iter()
            .enumerate()
            .fold(0u16, |mask, (idx, cell)| {
                if *cell == 0 {
                    mask | (1u16 << idx)
                } else {
                    mask
                }
            })
    }

    /// Place the current player's piece, or `None` if the move is illegal.
    pub fn make_move(&self, position: u8) -> Option<State> {
        if self.is_done() || position >= 9 || self.board[position as usize] != 0 {
            return None;
        }

        let mut new_state = *self;
        new_state.board[position as usize] = self.current_player;
        new_state.winner = Self::check_winner(&new_state.board);
        new_state.current_player = if self.current_player == 1 { 2 } else { 1 };

        Some(new_state)
    }

    /// Check for winner on the board
    fn check_winner(board: &[u8; 9]) -> u8 {
        // Winning positions (rows, columns, diagonals)
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8], // rows
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8], // columns
            [0, 4, 8],
            [2, 4, 6], // diagonals
        ];

        for line in &LINES {
            let [a, b, c] = *line;
            if board[a] != 0 && board[a] == board[b] && board[b] == board[c] {
                return board[a]; // Return the winning player
            }
        }

        // Check for draw (board full but no winner)
        if board.iter().all(|&cell| cell != 0) {
            return winner::DRAW;
        }

        winner::NONE
    }

    /// Same position with the roles of X and O exchanged.
    fn swapped(&self) -> State {
        let mut out = *self;
        swap_labels(&mut out.board);
        out.current_player = if self.current_player == 1 { 2 } else { 1 };
        out.winner = match self.winner {
            winner::FIRST => winner::SECOND,
            winner::SECOND => winner::FIRST,
            other => other,
        };
        out
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let cells: Vec<char> = self.board[row * 3..row * 3 + 3]
                .iter()
                .map(|&cell| match cell {
                    1 => 'X',
                    2 => 'O',
                    _ => '.',
                })
                .collect();
            writeln!(f, "{} {} {}", cells[0], cells[1], cells[2])?;
        }
        Ok(())
    }
}

/// TicTacToe action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Place a piece at the given position (0-8)
    Place(u8),
}

impl Move {
    /// Get the position for this action
    pub fn position(&self) -> u8 {
        match self {
            Move::Place(pos) => *pos,
        }
    }
}

/// TicTacToe game implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Create a new TicTacToe game
    pub fn new() -> Self {
        Self
    }
}

impl Game for TicTacToe {
    type Position = State;
    type Move = Move;

    fn name(&self) -> &'static str {
        "tictactoe"
    }

    fn action_size(&self) -> usize {
        NUM_ACTIONS
    }

    fn initial_position(&self) -> State {
        State::new()
    }

    fn canonical_form(&self, position: &State, to_move: Player) -> State {
        match to_move {
            Player::First => *position,
            Player::Second => position.swapped(),
        }
    }

    fn legal_action_mask(&self, position: &State) -> Vec<bool> {
        mask_from_bits(position.legal_moves_mask() as u64, NUM_ACTIONS)
    }

    fn terminal_outcome(&self, position: &State, reference: Player) -> Option<Outcome> {
        outcome_for(position.winner, reference)
    }

    fn decode_action(&self, action: Action) -> Result<Move, GameError> {
        if action >= NUM_ACTIONS {
            return Err(GameError::InvalidAction {
                action,
                action_size: NUM_ACTIONS,
            });
        }
        Ok(Move::Place(action as u8))
    }

    fn apply_move(&self, position: &State, mv: Move) -> Result<(State, Player), GameError> {
        let next = position
            .make_move(mv.position())
            .ok_or(GameError::IllegalMove {
                action: mv.position() as usize,
            })?;
        // Turns always alternate: the opponent of the mover plays next.
        Ok((next, Player::Second))
    }

    fn state_key(&self, position: &State) -> StateKey {
        // Winner is a function of the board, so board + side to move is enough.
        let mut bytes = Vec::with_capacity(10);
        bytes.extend_from_slice(&position.board);
        bytes.push(position.current_player);
        StateKey::from(bytes)
    }
}
