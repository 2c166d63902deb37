//! Legal move generation.
//!
//! Moves come out in a fixed order: pieces in row-major order of their
//! square, and for each piece the diagonals in the order given by
//! [`Rank::directions`]. Capture chains are explored depth first in that same
//! direction order, so the search sees a reproducible sequence.

use crate::board::{Board, Move, Pos, Rank, Side};
use crate::error::Result;

/// Every legal move for `side`. Captures are forced: if any piece can jump,
/// only complete capture chains are returned.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    let captures = capture_moves(board, side);
    if !captures.is_empty() {
        return captures;
    }
    simple_moves(board, side)
}

/// Maximal capture chains for every piece of `side`.
pub fn capture_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::new();
    for piece in board.pieces_of(side) {
        let mut chain = Chain {
            board,
            side,
            from: piece.pos,
            path: Vec::new(),
            captured: Vec::new(),
        };
        chain.extend(piece.pos, piece.rank, &mut moves);
    }
    moves
}

/// Single diagonal steps into empty squares, ignoring the capture rule.
pub fn simple_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .pieces_of(side)
        .flat_map(move |piece| {
            piece.rank.directions(side).iter().filter_map(move |&(d_row, d_col)| {
                let to = piece.pos.offset(d_row, d_col)?;
                board.occupant(to).is_none().then(|| Move::step(side, piece.pos, to))
            })
        })
        .collect()
}

/// A capture chain under construction for one piece.
struct Chain<'a> {
    board: &'a Board,
    side: Side,
    from: Pos,
    path: Vec<Pos>,
    captured: Vec<Pos>,
}

impl Chain<'_> {
    /// Tries every jump from `at`; emits the chain once no jump is left.
    fn extend(&mut self, at: Pos, rank: Rank, out: &mut Vec<Move>) {
        let mut jumped = false;
        for &(d_row, d_col) in rank.directions(self.side) {
            let Some((over, landing)) = self.jump(at, d_row, d_col) else {
                continue;
            };
            // crowned mid-chain: the rest of the chain uses king jumps
            let rank = if landing.row == self.side.promotion_row() { Rank::King } else { rank };

            self.path.push(landing);
            self.captured.push(over);
            self.extend(landing, rank, out);
            self.path.pop();
            self.captured.pop();
            jumped = true;
        }

        if !jumped && !self.captured.is_empty() {
            out.push(Move {
                side: self.side,
                from: self.from,
                to: at,
                path: self.path.clone(),
                captured: self.captured.clone(),
            });
        }
    }

    /// Jumped and landing squares of a jump from `at`, if the jumped square
    /// holds an enemy piece not yet taken in this chain and the landing square
    /// is free. Captured pieces stay on the board until the turn ends, so they
    /// block landings; the moving piece's own start square counts as free.
    fn jump(&self, at: Pos, d_row: isize, d_col: isize) -> Option<(Pos, Pos)> {
        let over = at.offset(d_row, d_col)?;
        let landing = over.offset(d_row, d_col)?;
        if self.captured.contains(&over) {
            return None;
        }
        match self.board.occupant(over) {
            Some(piece) if piece.side != self.side => {}
            _ => return None,
        }
        if landing != self.from && self.board.occupant(landing).is_some() {
            return None;
        }
        Some((over, landing))
    }
}

/// Number of leaf positions `depth` plies below `board` with `side` to move.
pub fn perft(board: &Board, side: Side, depth: u32) -> Result<u64> {
    if depth == 0 {
        return Ok(1);
    }
    let moves = legal_moves(board, side);
    if depth == 1 {
        return Ok(moves.len() as u64);
    }
    moves.iter().try_fold(0, |nodes, mv| {
        Ok(nodes + perft(&board.apply_move(mv)?, !side, depth - 1)?)
    })
}
