//! Mill game on the standard 24-point board.
//!
//! - Placement: sides alternately place their pieces on empty points
//! - Movement: slide a piece along a line to an adjacent empty point
//! - Flying: a side down to the flying threshold moves anywhere
//! - Closing a mill owes a capture; nothing else is accepted until it is made
//! - Fewer than three pieces, or no legal move, loses

mod board;
mod eval;
mod rules;

pub use board::{
    mills_through, neighbors, MillAction, MillMove, MillPhase, MillState, MILLS, POINT_COUNT,
};
pub use eval::MillEvaluator;
pub use rules::{MillRules, MIN_PIECES};
