//! 8x8 draughts.
//!
//! - 12 men per side on the dark squares of the three nearest rows
//! - Men step and jump diagonally forward; kings in all four directions
//! - One capture per move, optionally mandatory
//! - A side with no pieces or no legal moves loses

mod board;
mod eval;
mod rules;

pub use board::{
    col_of, forward, is_playable, promotion_row, row_of, square, DraughtsMove, DraughtsState,
    Piece, BOARD_SIZE, PLAYABLE_COUNT, SQUARE_COUNT,
};
pub use eval::DraughtsEvaluator;
pub use rules::DraughtsRules;
