//! Players and game outcomes for two-player zero-sum games.

use std::fmt;

/// One of the two sides of a two-player game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    /// The side that moves first from the initial position.
    First,
    /// The side that moves second.
    Second,
}

impl Player {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// +1 for the first player, -1 for the second.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Player::First => 1.0,
            Player::Second => -1.0,
        }
    }

    /// Zero-based index (0 = first, 1 = second).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    /// Board label used by the bundled games (1 = first, 2 = second).
    #[inline]
    pub fn label(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Inverse of [`Player::label`].
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            1 => Some(Player::First),
            2 => Some(Player::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "first"),
            Player::Second => write!(f, "second"),
        }
    }
}

/// Result of a finished game, seen from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Scalar value in {-1, 0, 1}.
    #[inline]
    pub fn value(self) -> f32 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => -1.0,
            Outcome::Draw => 0.0,
        }
    }

    /// The same result seen from the other player's perspective.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}
