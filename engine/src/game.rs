//! A game in progress: the board, whose turn it is, and the draw rule.

use std::fmt;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, Side};
use crate::engine::{Engine, SearchResult};
use crate::error::{CheckersError, Result};

/// Consecutive king moves without a capture after which the game is drawn.
pub const DEFAULT_MAX_QUIET_PLIES: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    InProgress,
    Won(Side),
    Draw,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Won(side) => write!(f, "won by {side}"),
            GameStatus::Draw => write!(f, "draw"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Side,
    first: Side,
    plies: u32,
    quiet_plies: u32,
    max_quiet_plies: u32,
}

impl Game {
    pub fn new(first: Side) -> Self {
        Self::from_board(Board::initial_standard(), first)
    }

    pub fn from_board(board: Board, turn: Side) -> Self {
        Self {
            board,
            turn,
            first: turn,
            plies: 0,
            quiet_plies: 0,
            max_quiet_plies: DEFAULT_MAX_QUIET_PLIES,
        }
    }

    pub fn with_max_quiet_plies(mut self, max_quiet_plies: u32) -> Self {
        self.max_quiet_plies = max_quiet_plies;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves(self.turn)
    }

    pub fn status(&self) -> GameStatus {
        if let Some(winner) = self.board.winner(self.turn) {
            GameStatus::Won(winner)
        } else if self.quiet_plies >= self.max_quiet_plies {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    /// Plays `mv` for the side to move after checking it against the legal moves.
    pub fn play(&mut self, mv: &Move) -> Result<GameStatus> {
        if self.status().is_over() {
            return Err(CheckersError::GameOver);
        }
        if mv.side != self.turn {
            warn!("{} tried to move on {}'s turn", mv.side, self.turn);
            return Err(CheckersError::IllegalMove {
                from: mv.from,
                to: mv.to,
                reason: "not this side's turn",
            });
        }
        let next = self.board.apply_legal_move(mv).map_err(|err| {
            warn!("rejected {} move {mv}: {err}", self.turn);
            err
        })?;

        // captures and man moves cannot be undone; only king shuffles count
        let man_moved = matches!(self.board.piece_at(mv.from)?, Some(piece) if !piece.is_king());
        if mv.is_capture() || man_moved {
            self.quiet_plies = 0;
        } else {
            self.quiet_plies += 1;
        }

        info!("{} plays {mv}", self.turn);
        self.board = next;
        self.turn = !self.turn;
        self.plies += 1;
        Ok(self.status())
    }

    /// Lets the engine pick and play a move for the side to move. With a
    /// `budget` the search deepens iteratively up to `depth`.
    pub fn play_engine_move(
        &mut self,
        engine: &Engine,
        depth: u32,
        budget: Option<Duration>,
    ) -> Result<SearchResult> {
        if self.status().is_over() {
            return Err(CheckersError::GameOver);
        }
        let result = match budget {
            Some(budget) => engine.best_move_within(&self.board, self.turn, depth, budget)?,
            None => engine.best_move(&self.board, self.turn, depth)?,
        };
        self.play(&result.best_move)?;
        Ok(result)
    }

    /// Back to the opening position with the original first mover.
    pub fn reset(&mut self) {
        *self = Self::new(self.first).with_max_quiet_plies(self.max_quiet_plies);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Side::Dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    #[test]
    fn turns_alternate() {
        let mut game = Game::default();
        let mv = game.legal_moves()[0].clone();
        assert_eq!(game.play(&mv), Ok(GameStatus::InProgress));
        assert_eq!(game.turn(), Side::Light);
        assert_eq!(game.plies(), 1);

        // dark cannot move twice in a row
        let again = game.board().legal_moves(Side::Dark)[0].clone();
        assert!(matches!(game.play(&again), Err(CheckersError::IllegalMove { .. })));
        assert_eq!(game.turn(), Side::Light);
    }

    #[test]
    fn rejects_moves_not_on_the_list() {
        let mut game = Game::default();
        let leap = Move::step(Side::Dark, Pos::new(2, 1), Pos::new(4, 3));
        assert!(matches!(game.play(&leap), Err(CheckersError::IllegalMove { .. })));
        assert_eq!(game.board(), &Board::initial_standard());
    }

    #[test]
    fn capturing_the_last_piece_wins() {
        let board: Board = "
            ........
            ........
            .d......
            ..l.....
            ........
            ........
            ........
            ........"
            .parse()
            .unwrap();
        let mut game = Game::from_board(board, Side::Dark);
        let capture = game.legal_moves()[0].clone();
        assert_eq!(game.play(&capture), Ok(GameStatus::Won(Side::Dark)));
        assert_eq!(game.play(&capture), Err(CheckersError::GameOver));
    }

    #[test]
    fn king_shuffling_is_drawn() {
        let board: Board = "
            .D......
            ........
            ........
            ........
            ........
            ........
            ........
            ......L."
            .parse()
            .unwrap();
        let mut game = Game::from_board(board, Side::Dark).with_max_quiet_plies(4);
        let mut status = GameStatus::InProgress;
        for _ in 0..4 {
            assert_eq!(status, GameStatus::InProgress);
            let mv = game.legal_moves()[0].clone();
            status = game.play(&mv).unwrap();
        }
        assert_eq!(status, GameStatus::Draw);
    }

    #[test]
    fn man_moves_reset_the_draw_count() {
        let board: Board = "
            .D......
            ........
            ........
            ........
            ........
            ........
            ........
            l......."
            .parse()
            .unwrap();
        let mut game = Game::from_board(board, Side::Dark).with_max_quiet_plies(2);
        let plies = [
            Move::step(Side::Dark, Pos::new(0, 1), Pos::new(1, 0)),
            Move::step(Side::Light, Pos::new(7, 0), Pos::new(6, 1)),
            Move::step(Side::Dark, Pos::new(1, 0), Pos::new(0, 1)),
            Move::step(Side::Light, Pos::new(6, 1), Pos::new(5, 0)),
        ];
        for mv in &plies {
            assert_eq!(game.play(mv), Ok(GameStatus::InProgress), "{mv}");
        }
        // the king move alone does count
        let mut shuffled = Game::from_board(board, Side::Dark).with_max_quiet_plies(1);
        assert_eq!(shuffled.play(&plies[0]), Ok(GameStatus::Draw));
    }

    #[test]
    fn engine_moves_and_reset() {
        let engine = Engine::default();
        let mut game = Game::new(Side::Light);
        let result = game.play_engine_move(&engine, 2, None).unwrap();
        assert_eq!(result.best_move.side, Side::Light);
        assert_eq!(game.board(), &result.board);
        assert_eq!(game.turn(), Side::Dark);

        game.reset();
        assert_eq!(game.turn(), Side::Light);
        assert_eq!(game.plies(), 0);
        assert_eq!(game.board(), &Board::initial_standard());
    }
}
