//! Draughts board geometry, pieces, moves and state.
//!
//! Squares are addressed `row * 8 + col` on the full 8x8 grid; only dark
//! squares (`row + col` odd) are playable. Internally the 32 dark squares are
//! stored densely.
//!
//! `Side::First` starts on rows 5-7 and moves toward row 0.
//! `Side::Second` starts on rows 0-2 and moves toward row 7.

use serde::{Deserialize, Serialize};

use crate::core::{captured_by, CaptureHistory, Side};
use crate::rules::GameResult;

/// Squares per row.
pub const BOARD_SIZE: usize = 8;

/// Squares on the full grid.
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Playable (dark) squares.
pub const PLAYABLE_COUNT: usize = SQUARE_COUNT / 2;

/// Square index from row and column.
#[must_use]
pub const fn square(row: usize, col: usize) -> usize {
    row * BOARD_SIZE + col
}

/// Row of a square.
#[must_use]
pub const fn row_of(square: usize) -> usize {
    square / BOARD_SIZE
}

/// Column of a square.
#[must_use]
pub const fn col_of(square: usize) -> usize {
    square % BOARD_SIZE
}

/// Whether a square can hold a piece.
#[must_use]
pub const fn is_playable(square: usize) -> bool {
    square < SQUARE_COUNT && (row_of(square) + col_of(square)) % 2 == 1
}

/// Row direction a side's men move in.
#[must_use]
pub const fn forward(side: Side) -> isize {
    match side {
        Side::First => -1,
        Side::Second => 1,
    }
}

/// Row on which a side's men are crowned.
#[must_use]
pub const fn promotion_row(side: Side) -> usize {
    match side {
        Side::First => 0,
        Side::Second => BOARD_SIZE - 1,
    }
}

/// Dense index of a playable square.
const fn dense(square: usize) -> usize {
    square / 2
}

/// A man or a king.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Owner.
    pub side: Side,
    /// Crowned pieces move in all four diagonals.
    pub king: bool,
}

impl Piece {
    /// An uncrowned piece.
    #[must_use]
    pub const fn man(side: Side) -> Self {
        Self { side, king: false }
    }

    /// A crowned piece.
    #[must_use]
    pub const fn king(side: Side) -> Self {
        Self { side, king: true }
    }
}

/// A diagonal step or a single jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraughtsMove {
    /// Side making the move.
    pub side: Side,
    /// Origin square.
    pub from: usize,
    /// Destination square.
    pub to: usize,
}

impl DraughtsMove {
    /// Create a new move.
    #[must_use]
    pub const fn new(side: Side, from: usize, to: usize) -> Self {
        Self { side, from, to }
    }

    /// True for a two-square capturing jump.
    #[must_use]
    pub fn is_jump(&self) -> bool {
        row_of(self.from).abs_diff(row_of(self.to)) == 2
    }

    /// Square jumped over, for jumps.
    #[must_use]
    pub fn jumped(&self) -> Option<usize> {
        self.is_jump().then(|| (self.from + self.to) / 2)
    }
}

impl std::fmt::Display for DraughtsMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = if self.is_jump() { 'x' } else { '-' };
        write!(f, "{} {}{}{}", self.side, self.from, sep, self.to)
    }
}

/// Draughts game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraughtsState {
    pub(crate) cells: [Option<Piece>; PLAYABLE_COUNT],
    pub(crate) to_move: Side,
    pub(crate) selected: Option<usize>,
    pub(crate) valid_moves: Vec<DraughtsMove>,
    pub(crate) result: Option<GameResult>,
    pub(crate) captures: CaptureHistory,
    pub(crate) last_move: Option<DraughtsMove>,
    pub(crate) quiet_plies: u16,
}

impl DraughtsState {
    pub(crate) fn empty(to_move: Side) -> Self {
        Self {
            cells: [None; PLAYABLE_COUNT],
            to_move,
            selected: None,
            valid_moves: Vec::new(),
            result: None,
            captures: CaptureHistory::new(),
            last_move: None,
            quiet_plies: 0,
        }
    }

    /// Piece on a square (`None` for empty or unplayable squares).
    #[must_use]
    pub fn piece_at(&self, square: usize) -> Option<Piece> {
        if is_playable(square) {
            self.cells[dense(square)]
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, square: usize, piece: Option<Piece>) {
        self.cells[dense(square)] = piece;
    }

    /// Occupied squares in ascending order.
    pub fn pieces(&self) -> impl Iterator<Item = (usize, Piece)> + '_ {
        (0..SQUARE_COUNT)
            .filter(|&sq| is_playable(sq))
            .filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Pieces a side has on the board.
    #[must_use]
    pub fn piece_count(&self, side: Side) -> usize {
        self.cells.iter().flatten().filter(|p| p.side == side).count()
    }

    /// Pieces on the board for both sides.
    #[must_use]
    pub fn total_pieces(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Side to move.
    #[must_use]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Square highlighted by the last selection.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Destinations reachable from the selected square.
    #[must_use]
    pub fn valid_destinations(&self) -> Vec<usize> {
        match self.selected {
            Some(from) => self
                .valid_moves
                .iter()
                .filter(|mv| mv.from == from)
                .map(|mv| mv.to)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every legal move for the side to move.
    #[must_use]
    pub fn valid_moves(&self) -> &[DraughtsMove] {
        &self.valid_moves
    }

    /// Final result, if the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Game-over flag.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// Capture log.
    #[must_use]
    pub fn captures(&self) -> &CaptureHistory {
        &self.captures
    }

    /// Pieces captured by a side.
    #[must_use]
    pub fn captured_by(&self, side: Side) -> u32 {
        captured_by(&self.captures, side)
    }

    /// Most recent move.
    #[must_use]
    pub fn last_move(&self) -> Option<DraughtsMove> {
        self.last_move
    }

    /// Consecutive plies without a capture.
    #[must_use]
    pub fn quiet_plies(&self) -> u16 {
        self.quiet_plies
    }
}

impl std::fmt::Display for DraughtsState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_SIZE {
            let line: String = (0..BOARD_SIZE)
                .map(|col| match self.piece_at(square(row, col)) {
                    Some(Piece { side: Side::First, king: false }) => 'w',
                    Some(Piece { side: Side::First, king: true }) => 'W',
                    Some(Piece { side: Side::Second, king: false }) => 'b',
                    Some(Piece { side: Side::Second, king: true }) => 'B',
                    None if is_playable(square(row, col)) => '.',
                    None => ' ',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        assert!(is_playable(square(0, 1)));
        assert!(!is_playable(square(0, 0)));
        assert!(is_playable(square(7, 0)));
        assert!(!is_playable(64));

        let playable: Vec<usize> = (0..SQUARE_COUNT).filter(|&s| is_playable(s)).collect();
        assert_eq!(playable.len(), PLAYABLE_COUNT);
        let dense_indices: Vec<usize> = playable.iter().map(|&s| dense(s)).collect();
        assert_eq!(dense_indices, (0..PLAYABLE_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_jump_detection() {
        let step = DraughtsMove::new(Side::First, square(5, 0), square(4, 1));
        assert!(!step.is_jump());
        assert_eq!(step.jumped(), None);

        let jump = DraughtsMove::new(Side::First, square(5, 2), square(3, 4));
        assert!(jump.is_jump());
        assert_eq!(jump.jumped(), Some(square(4, 3)));
        assert_eq!(jump.to_string(), "first 42x28");
    }
}
