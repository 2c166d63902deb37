use std::fmt;
use std::str::FromStr;

use bitvec::{prelude::*, slice::IterOnes};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{CheckersError, Result};
use crate::movegen;

pub const ROWS: usize = 8;
pub const COLS: usize = 8;
const B: usize = ROWS * COLS;
pub const PIECES_PER_SIDE: usize = 12;
pub type BitBoard = BitArr!(for B, in u64, Lsb0);
// bit (row * COLS + col); row 0 is Dark's home rank, row 7 is Light's

pub trait BitArr2D {
    fn empty() -> Self;
    fn set_point(&mut self, pos: Pos, value: bool);
    fn point(&self, pos: Pos) -> bool;
    type IterPoints<'a>: Iterator<Item=Pos> + 'a where Self: 'a;
    fn iter_set_points(&'_ self) -> Self::IterPoints<'_>;
}

impl BitArr2D for BitBoard {
    fn empty() -> Self {
        bitarr!(u64, Lsb0; 0; B)
    }

    fn set_point(&mut self, pos: Pos, value: bool) {
        self.set(pos.index(), value);
    }

    fn point(&self, pos: Pos) -> bool {
        self[pos.index()]
    }

    type IterPoints<'a> = std::iter::Map<IterOnes<'a, u64, Lsb0>, fn(usize) -> Pos>;

    fn iter_set_points(&'_ self) -> Self::IterPoints<'_> {
        self.iter_ones().map(Pos::from_index as fn(usize) -> Pos)
    }
}

lazy_static! {
    static ref PLAYABLE_SQUARES: BitBoard = {
        let mut playable = BitBoard::empty();
        for row in 0..ROWS {
            for col in 0..COLS {
                if (row + col) % 2 == 1 {
                    playable.set_point(Pos::new(row, col), true);
                }
            }
        }
        playable
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        self.row < ROWS && self.col < COLS
    }

    /// Dark squares only; the other half of the grid is never used.
    pub fn is_playable(self) -> bool {
        self.is_on_board() && PLAYABLE_SQUARES.point(self)
    }

    /// Neighbouring square along a diagonal, `None` past the edge.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Pos> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let pos = Pos::new(row, col);
        pos.is_on_board().then_some(pos)
    }

    fn checked(self) -> Result<Pos> {
        if self.is_on_board() {
            Ok(self)
        } else {
            Err(CheckersError::OutOfBounds { row: self.row, col: self.col })
        }
    }

    fn index(self) -> usize {
        self.row * COLS + self.col
    }

    fn from_index(idx: usize) -> Pos {
        Pos::new(idx / COLS, idx % COLS)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Pos::new(row, col)
    }
}

impl From<Pos> for (usize, usize) {
    fn from(pos: Pos) -> Self {
        (pos.row, pos.col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Dark,
    Light,
}

impl Side {
    pub fn opponent(self) -> Side {
        !self
    }

    pub fn home_row(self) -> usize {
        match self {
            Side::Dark => 0,
            Side::Light => ROWS - 1,
        }
    }

    /// The opponent's back rank, where men of this side are crowned.
    pub fn promotion_row(self) -> usize {
        self.opponent().home_row()
    }
}

impl std::ops::Not for Side {
    type Output = Side;

    fn not(self) -> Self::Output {
        match self {
            Side::Dark => Side::Light,
            Side::Light => Side::Dark,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Dark => write!(f, "dark"),
            Side::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Side {
    type Err = CheckersError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Side::Dark),
            "light" => Ok(Side::Light),
            other => Err(CheckersError::Parse(format!("unknown side `{other}`"))),
        }
    }
}

const DARK_MAN_DIRECTIONS: [(isize, isize); 2] = [(1, -1), (1, 1)];
const LIGHT_MAN_DIRECTIONS: [(isize, isize); 2] = [(-1, -1), (-1, 1)];
const KING_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Man,
    King,
}

impl Rank {
    /// Diagonal steps available to a piece of this rank, in generation order.
    pub fn directions(self, side: Side) -> &'static [(isize, isize)] {
        match (self, side) {
            (Rank::King, _) => &KING_DIRECTIONS,
            (Rank::Man, Side::Dark) => &DARK_MAN_DIRECTIONS,
            (Rank::Man, Side::Light) => &LIGHT_MAN_DIRECTIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub rank: Rank,
    pub pos: Pos,
}

impl Piece {
    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    fn symbol(&self) -> char {
        match (self.side, self.rank) {
            (Side::Dark, Rank::Man) => 'd',
            (Side::Dark, Rank::King) => 'D',
            (Side::Light, Rank::Man) => 'l',
            (Side::Light, Rank::King) => 'L',
        }
    }
}

/// One complete turn: a single step, or a whole capture chain collapsed
/// into one move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub side: Side,
    pub from: Pos,
    pub to: Pos,
    /// Landing square of every jump in order, ending with `to`. Empty for a step.
    pub path: Vec<Pos>,
    /// Squares of the captured pieces, in capture order.
    pub captured: Vec<Pos>,
}

impl Move {
    pub fn step(side: Side, from: Pos, to: Pos) -> Self {
        Self { side, from, to, path: Vec::new(), captured: Vec::new() }
    }

    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// True when the capture carried on past its first jump.
    pub fn is_chain_continuation(&self) -> bool {
        self.captured.len() > 1
    }

    fn crosses_row(&self, row: usize) -> bool {
        self.to.row == row || self.path.iter().any(|pos| pos.row == row)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.from)?;
        if self.path.is_empty() {
            write!(f, "-{}", self.to)
        } else {
            for landing in &self.path {
                write!(f, "x{landing}")?;
            }
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    dark_squares: BitBoard,
    light_squares: BitBoard,
    king_squares: BitBoard,
}

impl Default for Board {
    fn default() -> Self {
        Self::initial_standard()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            dark_squares: BitBoard::empty(),
            light_squares: BitBoard::empty(),
            king_squares: BitBoard::empty(),
        }
    }

    /// Dark men on rows 0-2, Light men on rows 5-7.
    pub fn initial_standard() -> Self {
        let mut board = Self::empty();
        for pos in PLAYABLE_SQUARES.iter_set_points() {
            if pos.row < 3 {
                board.dark_squares.set_point(pos, true);
            } else if pos.row > 4 {
                board.light_squares.set_point(pos, true);
            }
        }
        board
    }

    /// Copy of this board with one more piece, for setting up positions.
    pub fn with_piece(&self, pos: Pos, side: Side, rank: Rank) -> Result<Board> {
        let pos = pos.checked()?;
        if !pos.is_playable() {
            return Err(CheckersError::UnplayableSquare { row: pos.row, col: pos.col });
        }
        if self.occupant(pos).is_some() {
            return Err(CheckersError::SquareOccupied { row: pos.row, col: pos.col });
        }
        let mut board = *self;
        board.squares_mut(side).set_point(pos, true);
        board.king_squares.set_point(pos, rank == Rank::King);
        Ok(board)
    }

    pub fn piece_at(&self, pos: Pos) -> Result<Option<Piece>> {
        Ok(self.occupant(pos.checked()?))
    }

    /// Unchecked lookup; `pos` must be on the board.
    pub(crate) fn occupant(&self, pos: Pos) -> Option<Piece> {
        let side = if self.dark_squares.point(pos) {
            Side::Dark
        } else if self.light_squares.point(pos) {
            Side::Light
        } else {
            return None;
        };
        let rank = if self.king_squares.point(pos) { Rank::King } else { Rank::Man };
        Some(Piece { side, rank, pos })
    }

    fn squares(&self, side: Side) -> &BitBoard {
        match side {
            Side::Dark => &self.dark_squares,
            Side::Light => &self.light_squares,
        }
    }

    fn squares_mut(&mut self, side: Side) -> &mut BitBoard {
        match side {
            Side::Dark => &mut self.dark_squares,
            Side::Light => &mut self.light_squares,
        }
    }

    /// Pieces of `side` in row-major order.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item=Piece> + '_ {
        self.squares(side).iter_set_points().filter_map(move |pos| self.occupant(pos))
    }

    pub fn count(&self, side: Side) -> usize {
        self.squares(side).count_ones()
    }

    pub fn kings(&self, side: Side) -> usize {
        (*self.squares(side) & self.king_squares).count_ones()
    }

    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        movegen::legal_moves(self, side)
    }

    /// `side` has lost: no pieces left, or every piece is blocked.
    pub fn is_terminal_for(&self, side: Side) -> bool {
        self.count(side) == 0 || movegen::legal_moves(self, side).is_empty()
    }

    /// Winner with `to_move` about to play, if the game is decided.
    pub fn winner(&self, to_move: Side) -> Option<Side> {
        self.is_terminal_for(to_move).then(|| to_move.opponent())
    }

    /// Returns the board after `mv`, leaving `self` untouched. Only checks
    /// that the move fits the board; use [`Board::apply_legal_move`] for
    /// moves that did not come from the move generator.
    pub fn apply_move(&self, mv: &Move) -> Result<Board> {
        let illegal = |reason| CheckersError::IllegalMove {
            from: mv.from,
            to: mv.to,
            reason,
        };
        let from = mv.from.checked()?;
        let to = mv.to.checked()?;
        if !to.is_playable() {
            return Err(illegal("destination is not a playable square"));
        }
        let piece = self.occupant(from).ok_or_else(|| illegal("source square is empty"))?;
        if piece.side != mv.side {
            return Err(illegal("piece belongs to the other side"));
        }
        // only a capture chain may end on its own starting square
        let returns_home = to == from && mv.is_capture();
        if !returns_home && self.occupant(to).is_some() {
            return Err(illegal("destination square is occupied"));
        }
        for &square in &mv.captured {
            match self.occupant(square.checked()?) {
                Some(victim) if victim.side != mv.side => {}
                _ => return Err(illegal("captured square holds no enemy piece")),
            }
        }

        let mut board = *self;
        board.squares_mut(mv.side).set_point(from, false);
        board.king_squares.set_point(from, false);
        for &square in &mv.captured {
            board.squares_mut(mv.side.opponent()).set_point(square, false);
            board.king_squares.set_point(square, false);
        }
        let crowned = piece.is_king() || mv.crosses_row(mv.side.promotion_row());
        board.squares_mut(mv.side).set_point(to, true);
        board.king_squares.set_point(to, crowned);
        Ok(board)
    }

    /// Like [`Board::apply_move`], but first checks `mv` against the legal moves.
    pub fn apply_legal_move(&self, mv: &Move) -> Result<Board> {
        if !movegen::legal_moves(self, mv.side).contains(mv) {
            return Err(CheckersError::IllegalMove {
                from: mv.from,
                to: mv.to,
                reason: "not a legal move in this position",
            });
        }
        self.apply_move(mv)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                let symbol = self.occupant(Pos::new(row, col)).map_or('.', |piece| piece.symbol());
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = CheckersError;

    /// Eight rows of eight cells, `d`/`D` dark man/king, `l`/`L` light man/king,
    /// `.` empty. Whitespace inside a row is ignored; blank lines are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|cells| !cells.is_empty())
            .collect();
        if rows.len() != ROWS {
            return Err(CheckersError::Parse(format!("expected {ROWS} rows, found {}", rows.len())));
        }

        let mut board = Board::empty();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != COLS {
                return Err(CheckersError::Parse(format!(
                    "row {row} has {} cells, expected {COLS}", cells.len()
                )));
            }
            for (col, &cell) in cells.iter().enumerate() {
                let (side, rank) = match cell {
                    '.' => continue,
                    'd' => (Side::Dark, Rank::Man),
                    'D' => (Side::Dark, Rank::King),
                    'l' => (Side::Light, Rank::Man),
                    'L' => (Side::Light, Rank::King),
                    other => {
                        return Err(CheckersError::Parse(format!("unknown cell `{other}` at ({row}, {col})")));
                    }
                };
                board = board.with_piece(Pos::new(row, col), side, rank)?;
            }
        }
        Ok(board)
    }
}
