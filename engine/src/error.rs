//! Error types for the checkers core.
//!
//! Every variant is a caller-contract violation: the core fails fast instead
//! of letting a bad coordinate or move corrupt a board.

use thiserror::Error;

use crate::board::{Pos, Side};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckersError {
    /// Coordinate outside the 8x8 grid
    #[error("square ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    /// Light square, never holds a piece
    #[error("square ({row}, {col}) is not a playable square")]
    UnplayableSquare { row: usize, col: usize },

    #[error("square ({row}, {col}) is already occupied")]
    SquareOccupied { row: usize, col: usize },

    #[error("illegal move {from} to {to}: {reason}")]
    IllegalMove {
        from: Pos,
        to: Pos,
        reason: &'static str,
    },

    #[error("{0} has no legal moves")]
    NoLegalMoves(Side),

    #[error("the game is already over")]
    GameOver,

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CheckersError>;
