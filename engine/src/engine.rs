use std::time::{Duration, Instant};

use log::{debug, info};
use serde::Serialize;

use crate::board::{Board, Move, Side};
use crate::error::{CheckersError, Result};
use crate::eval::{Evaluator, Weights};
use crate::movegen;

/// Magnitude of a decided game, larger than any heuristic score.
pub const WIN_SCORE: i32 = 1_000_000;
const INF: i32 = 2 * WIN_SCORE;
// no search gets this deep; scores past the threshold are forced results
const MAX_PLY: i32 = 1_000;

pub fn is_decisive(score: i32) -> bool {
    score.abs() > WIN_SCORE - MAX_PLY
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub best_move: Move,
    /// Position after `best_move`.
    #[serde(skip)]
    pub board: Board,
    /// From the searching side's point of view.
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    evaluator: Evaluator,
}

impl Engine {
    pub fn new(weights: Weights) -> Self {
        Self {
            evaluator: Evaluator::new(weights),
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Minimax with alpha-beta pruning, `depth` plies deep (at least one).
    /// Among equally scored moves the first one generated wins, so the result
    /// is fixed for a given board and depth.
    pub fn best_move(&self, board: &Board, side: Side, depth: u32) -> Result<SearchResult> {
        let depth = depth.max(1);
        let moves = movegen::legal_moves(board, side);
        let mut search = Search {
            evaluator: &self.evaluator,
            root: side,
            nodes: 1,
        };

        let mut alpha = -INF;
        let mut best: Option<(Move, Board, i32)> = None;
        for mv in moves {
            let child = board.apply_move(&mv)?;
            let score = search.minimax(&child, depth - 1, 1, alpha, INF, !side)?;
            if best.as_ref().map_or(true, |(_, _, best_score)| score > *best_score) {
                alpha = alpha.max(score);
                best = Some((mv, child, score));
            }
        }

        let (best_move, board, score) = best.ok_or(CheckersError::NoLegalMoves(side))?;
        info!("{side} picks {best_move} (score {score}, depth {depth}, {} nodes)", search.nodes);
        Ok(SearchResult {
            best_move,
            board,
            score,
            depth,
            nodes: search.nodes,
        })
    }

    /// Iterative deepening up to `max_depth`. A new iteration only starts while
    /// `budget` is not used up and no forced result has been found; the
    /// deepest completed iteration is returned.
    pub fn best_move_within(
        &self,
        board: &Board,
        side: Side,
        max_depth: u32,
        budget: Duration,
    ) -> Result<SearchResult> {
        let start = Instant::now();
        let mut result = self.best_move(board, side, 1)?;
        for depth in 2..=max_depth {
            if start.elapsed() >= budget || is_decisive(result.score) {
                break;
            }
            result = self.best_move(board, side, depth)?;
            debug!(
                "depth {depth}: {} score {} nodes {} after {:?}",
                result.best_move, result.score, result.nodes, start.elapsed()
            );
        }
        Ok(result)
    }
}

struct Search<'a> {
    evaluator: &'a Evaluator,
    /// Side the whole search maximizes for.
    root: Side,
    nodes: u64,
}

impl Search<'_> {
    /// Value of `board` for the root side with `to_move` to play.
    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        ply: i32,
        mut alpha: i32,
        mut beta: i32,
        to_move: Side,
    ) -> Result<i32> {
        self.nodes += 1;
        let moves = movegen::legal_moves(board, to_move);
        if moves.is_empty() {
            // sooner wins and later losses score better
            let magnitude = WIN_SCORE - ply;
            return Ok(if to_move == self.root { -magnitude } else { magnitude });
        }
        if depth == 0 {
            return Ok(self.evaluator.score(board, self.root));
        }

        if to_move == self.root {
            let mut value = -INF;
            for mv in &moves {
                let child = board.apply_move(mv)?;
                value = value.max(self.minimax(&child, depth - 1, ply + 1, alpha, beta, !to_move)?);
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
            Ok(value)
        } else {
            let mut value = INF;
            for mv in &moves {
                let child = board.apply_move(mv)?;
                value = value.min(self.minimax(&child, depth - 1, ply + 1, alpha, beta, !to_move)?);
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            Ok(value)
        }
    }
}
