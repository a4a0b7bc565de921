//! Connect 4 game implementation for the Tessera engine
//!
//! Connect 4 is a two-player connection game where players drop colored discs
//! into a 7-column, 6-row vertically suspended grid. The objective is to be
//! the first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! Actions are column indices.

use std::fmt;

use engine_core::game_utils::{mask_from_bits, outcome_for, swap_labels, winner};
use engine_core::{Action, Game, GameError, Outcome, Player, StateKey};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Connect4 game state
///
/// Represents the complete state of a Connect4 game including the board,
/// current player, and winner information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    /// Board representation: 0=empty, 1=Red (player 1), 2=Yellow (player 2)
    /// Stored in row-major order with row 0 at the bottom
    board: [u8; BOARD_SIZE],
    /// Current player: 1=Red, 2=Yellow
    current_player: u8,
    /// Winner: 0=none/ongoing, 1=Red, 2=Yellow, 3=draw
    winner: u8,
    /// Height of each column (0-6 means number of pieces in column)
    column_heights: [u8; COLS],
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [0; BOARD_SIZE],
            current_player: 1, // Red goes first
            winner: winner::NONE,
            column_heights: [0; COLS],
        }
    }

    pub fn current_player(&self) -> u8 {
        self.current_player
    }

    pub fn winner(&self) -> u8 {
        self.winner
    }

    /// Piece at (col, row), row 0 being the bottom.
    pub fn cell(&self, col: usize, row: usize) -> u8 {
        self.board[Self::pos(col, row)]
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner != winner::NONE
    }

    /// Get legal moves (columns that are not full)
    pub fn legal_moves(&self) -> Vec<u8> {
        if self.is_done() {
            return Vec::new();
        }

        (0..COLS as u8)
            .filter(|&col| self.column_heights[col as usize] < ROWS as u8)
            .collect()
    }

    /// Bit-mask representation of legal moves.
    ///
    /// Bits 0-6 correspond to columns 0-6. A bit set to 1 indicates the
    /// column is not full and a piece can be dropped there.
    pub fn legal_moves_mask(&self) -> u8 {
        if self.is_done() {
            return 0;
        }

        self.column_heights
            .iter()
            .enumerate()
            .fold(0u8, |mask, (col, &height)| {
                if height < ROWS as u8 {
                    mask | (1u8 << col)
                } else {
                    mask
                }
            })
    }

    /// Convert column and row to board index
    #[inline]
    fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    /// Drop a piece in the given column, or `None` if the move is illegal.
    pub fn drop_piece(&self, column: u8) -> Option<State> {
        let col = column as usize;

        if self.is_done() || col >= COLS || self.column_heights[col] >= ROWS as u8 {
            return None;
        }

        let mut new_state = self.clone();
        let row = self.column_heights[col] as usize;

        new_state.board[Self::pos(col, row)] = self.current_player;
        new_state.column_heights[col] += 1;
        new_state.winner = new_state.check_winner_at(col, row);
        new_state.current_player = if self.current_player == 1 { 2 } else { 1 };

        Some(new_state)
    }

    /// Check if the piece at (col, row) creates a winning line
    fn check_winner_at(&self, col: usize, row: usize) -> u8 {
        let player = self.board[Self::pos(col, row)];
        if player == 0 {
            return winner::NONE;
        }

        // Direction vectors: horizontal, vertical, diagonal /, diagonal \
        let directions: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for (dc, dr) in directions {
            let count = 1
                + self.run_length(col, row, dc, dr, player)
                + self.run_length(col, row, -dc, -dr, player);
            if count >= 4 {
                return player;
            }
        }

        // Check for draw (board full but no winner)
        if self.column_heights.iter().all(|&h| h >= ROWS as u8) {
            return winner::DRAW;
        }

        winner::NONE
    }

    /// Count consecutive `player` pieces from (col, row), exclusive, along (dc, dr).
    fn run_length(&self, col: usize, row: usize, dc: i32, dr: i32, player: u8) -> usize {
        let mut count = 0;
        let (mut c, mut r) = (col as i32 + dc, row as i32 + dr);
        while c >= 0 && c < COLS as i32 && r >= 0 && r < ROWS as i32 {
            if self.board[Self::pos(c as usize, r as usize)] != player {
                break;
            }
            count += 1;
            c += dc;
            r += dr;
        }
        count
    }

    /// Same position with the roles of Red and Yellow exchanged.
    fn swapped(&self) -> State {
        let mut out = self.clone();
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
        for row in (0..ROWS).rev() {
            let line: String = (0..COLS)
                .map(|col| match self.cell(col, row) {
                    1 => 'R',
                    2 => 'Y',
                    _ => '.',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Connect4 move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Drop a piece in the given column (0-6)
    Drop(u8),
}

impl Move {
    /// Get the column for this move
    pub fn column(&self) -> u8 {
        match self {
            Move::Drop(col) => *col,
        }
    }
}

/// Connect4 game implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct Connect4;

impl Connect4 {
    /// Create a new Connect4 game
    pub fn new() -> Self {
        Self
    }
}

impl Game for Connect4 {
    type Position = State;
    type Move = Move;

    fn name(&self) -> &'static str {
        "connect4"
    }

    fn action_size(&self) -> usize {
        COLS
    }

    fn initial_position(&self) -> State {
        State::new()
    }

    fn canonical_form(&self, position: &State, to_move: Player) -> State {
        match to_move {
            Player::First => position.clone(),
            Player::Second => position.swapped(),
        }
    }

    fn legal_action_mask(&self, position: &State) -> Vec<bool> {
        mask_from_bits(position.legal_moves_mask() as u64, COLS)
    }

    fn terminal_outcome(&self, position: &State, reference: Player) -> Option<Outcome> {
        outcome_for(position.winner, reference)
    }

    fn decode_action(&self, action: Action) -> Result<Move, GameError> {
        if action >= COLS {
            return Err(GameError::InvalidAction {
                action,
                action_size: COLS,
            });
        }
        Ok(Move::Drop(action as u8))
    }

    fn apply_move(&self, position: &State, mv: Move) -> Result<(State, Player), GameError> {
        let next = position
            .drop_piece(mv.column())
            .ok_or(GameError::IllegalMove {
                action: mv.column() as usize,
            })?;
        Ok((next, Player::Second))
    }

    fn state_key(&self, position: &State) -> StateKey {
        // Column heights and winner are derived from the board.
        let mut bytes = Vec::with_capacity(BOARD_SIZE + 1);
        bytes.extend_from_slice(&position.board);
        bytes.push(position.current_player);
        StateKey::from(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::game_utils::play_actions;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_initial_state() {
        let state = State::new();
        assert_eq!(state.board, [0; BOARD_SIZE]);
        assert_eq!(state.current_player, 1);
        assert_eq!(state.winner, 0);
        assert_eq!(state.column_heights, [0; COLS]);
    }

    #[test]
    fn test_legal_moves() {
        let state = State::new();
        assert_eq!(state.legal_moves(), (0..7).collect::<Vec<_>>());
        assert_eq!(state.legal_moves_mask(), 0b1111111);
    }

    #[test]
    fn test_drop_piece() {
        let state = State::new().drop_piece(3).unwrap();
        assert_eq!(state.cell(3, 0), 1);
        assert_eq!(state.column_heights[3], 1);
        assert_eq!(state.current_player, 2);
    }

    #[test]
    fn test_stacking_pieces() {
        let state = State::new()
            .drop_piece(3)
            .and_then(|s| s.drop_piece(3))
            .and_then(|s| s.drop_piece(3))
            .unwrap();
        assert_eq!(state.cell(3, 0), 1);
        assert_eq!(state.cell(3, 1), 2);
        assert_eq!(state.cell(3, 2), 1);
    }

    #[test]
    fn test_invalid_move_full_column() {
        let mut state = State::new();
        for _ in 0..ROWS {
            state = state.drop_piece(0).unwrap();
        }
        assert!(state.drop_piece(0).is_none());
        assert_eq!(state.legal_moves_mask() & 1, 0);
        assert!(!Connect4.legal_action_mask(&state)[0]);
    }

    #[test]
    fn test_horizontal_win() {
        let mut state = State::new();
        // Red: 0,1,2,3 on the bottom row; Yellow stacks on top
        for col in [0, 0, 1, 1, 2, 2, 3] {
            state = state.drop_piece(col).unwrap();
        }
        assert_eq!(state.winner, 1);
        assert!(state.is_done());
    }

    #[test]
    fn test_vertical_win() {
        let mut state = State::new();
        for col in [0, 1, 0, 1, 0, 1, 0] {
            state = state.drop_piece(col).unwrap();
        }
        assert_eq!(state.winner, 1);
    }

    #[test]
    fn test_diagonal_win_ascending() {
        let mut state = State::new();
        // Red builds (0,0) (1,1) (2,2) (3,3)
        for col in [0, 1, 1, 2, 2, 3, 2, 3, 3, 5, 3] {
            state = state.drop_piece(col).unwrap();
        }
        assert_eq!(state.winner, 1);
    }

    #[test]
    fn test_diagonal_win_descending() {
        let mut state = State::new();
        // Red builds (3,0) (2,1) (1,2) (0,3)
        for col in [3, 2, 2, 1, 1, 0, 1, 0, 0, 5, 0] {
            state = state.drop_piece(col).unwrap();
        }
        assert_eq!(state.winner, 1);
    }

    #[test]
    fn test_canonical_form_swaps_pieces() {
        let game = Connect4::new();
        let (position, to_move) = play_actions(&game, &[3]).unwrap();
        assert_eq!(to_move, Player::Second);
        // Red's disc belongs to the opponent of the canonical mover.
        assert_eq!(position.cell(3, 0), 2);
        assert_eq!(position.current_player, 1);
    }

    #[test]
    fn test_terminal_outcome_is_loss_for_mover() {
        let game = Connect4::new();
        let (position, _) = play_actions(&game, &[0, 1, 0, 1, 0, 1, 0]).unwrap();
        assert_eq!(
            game.terminal_outcome(&position, Player::First),
            Some(Outcome::Loss)
        );
    }

    #[test]
    fn test_invalid_action_decoding() {
        let game = Connect4::new();
        assert!(game.decode_action(7).is_err());
        assert_eq!(game.decode_action(6).unwrap(), Move::Drop(6));
    }

    #[test]
    fn test_display() {
        let state = State::new().drop_piece(3).unwrap();
        let rendered = state.to_string();
        assert_eq!(rendered.lines().count(), ROWS);
        assert_eq!(rendered.lines().last(), Some("...R..."));
    }

    #[test]
    fn test_random_games_invariants() {
        let game = Connect4::new();

        for seed in 0..20 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut position = game.initial_position();
            let mut move_count = 0;

            while game.terminal_outcome(&position, Player::First).is_none() {
                let legal = position.legal_moves();
                assert!(
                    !legal.is_empty(),
                    "Non-done game must have legal moves (seed={}, moves={})",
                    seed,
                    move_count
                );

                let col = legal[rng.gen_range(0..legal.len())] as usize;
                let (next, to_move) = game.apply_action(&position, col).unwrap();
                position = game.canonical_form(&next, to_move);
                move_count += 1;

                assert_eq!(position.current_player, 1, "seed={}", seed);
            }

            assert!(move_count <= BOARD_SIZE, "seed={}", seed);
            assert!(
                position.legal_moves().is_empty(),
                "Done game must have no legal moves (seed={})",
                seed
            );
            assert_ne!(
                game.terminal_outcome(&position, Player::First),
                Some(Outcome::Win),
                "seed={}",
                seed
            );
        }
    }
}
