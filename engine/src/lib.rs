//! Checkers rules and a minimax opponent.
//!
//! The crate holds no global state: callers own a [`Board`] (or a [`Game`])
//! and pass it in. Boards are plain values, so every move produces a new
//! board and search branches never see each other's positions.

pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod movegen;

pub use board::{Board, Move, Piece, Pos, Rank, Side};
pub use engine::{Engine, SearchResult, WIN_SCORE};
pub use error::{CheckersError, Result};
pub use eval::{Evaluator, Weights};
pub use game::{Game, GameStatus};
pub use movegen::{legal_moves, perft};
