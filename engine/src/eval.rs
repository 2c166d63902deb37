use crate::board::{Board, Piece, Rank, Side, COLS};

/// Evaluation weights, in hundredths of a man.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub man: i32,
    pub king: i32,
    /// Per row a man has advanced from its home rank.
    pub advancement: i32,
    /// Pieces on the four central files.
    pub center: i32,
    /// Men still guarding their own back rank.
    pub back_rank: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            man: 100,
            king: 300,
            advancement: 2,
            center: 4,
            back_rank: 5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    weights: Weights,
}

impl Evaluator {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Positive when `for_side` stands better. Both sides are scored with the
    /// same terms, so `score(b, s) == -score(b, !s)`.
    pub fn score(&self, board: &Board, for_side: Side) -> i32 {
        self.side_total(board, for_side) - self.side_total(board, !for_side)
    }

    fn side_total(&self, board: &Board, side: Side) -> i32 {
        board.pieces_of(side).map(|piece| self.piece_value(&piece)).sum()
    }

    fn piece_value(&self, piece: &Piece) -> i32 {
        let w = &self.weights;
        let central = (2..COLS - 2).contains(&piece.pos.col);
        let mut value = if central { w.center } else { 0 };
        match piece.rank {
            Rank::King => value += w.king,
            Rank::Man => {
                let home = piece.side.home_row();
                let advanced = home.abs_diff(piece.pos.row) as i32;
                value += w.man + advanced * w.advancement;
                if advanced == 0 {
                    value += w.back_rank;
                }
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    #[test]
    fn opening_position_is_level() {
        let eval = Evaluator::default();
        let board = Board::initial_standard();
        assert_eq!(eval.score(&board, Side::Dark), 0);
        assert_eq!(eval.score(&board, Side::Light), 0);
    }

    #[test]
    fn scores_are_zero_sum() {
        let eval = Evaluator::default();
        let board: Board = "
            .d...D..
            ........
            ...d.d..
            ..l.....
            ........
            L.......
            ...l.l..
            ........"
            .parse()
            .unwrap();
        let dark = eval.score(&board, Side::Dark);
        assert_ne!(dark, 0);
        assert_eq!(dark, -eval.score(&board, Side::Light));
    }

    #[test]
    fn king_outweighs_man() {
        let eval = Evaluator::default();
        let base = Board::empty().with_piece(Pos::new(2, 3), Side::Light, Rank::Man).unwrap();
        let with_man = base.with_piece(Pos::new(5, 4), Side::Dark, Rank::Man).unwrap();
        let with_king = base.with_piece(Pos::new(5, 4), Side::Dark, Rank::King).unwrap();
        assert!(eval.score(&with_king, Side::Dark) > eval.score(&with_man, Side::Dark));
    }

    #[test]
    fn material_dominates_position() {
        let eval = Evaluator::default();
        // one extra man on the rim beats a lone, well advanced man
        let ahead: Board = "
            ........
            ........
            ........
            ........
            ........
            ........
            .d......
            l.....l."
            .parse()
            .unwrap();
        assert!(eval.score(&ahead, Side::Light) > 0);
    }
}
