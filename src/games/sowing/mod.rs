//! Seed-sowing game in the Oware/Kalah family.
//!
//! - 6 pits and 1 store per side, 4 seeds per pit by default
//! - Oware style: capture 2s and 3s in the opponent's row, chained backward
//! - Kalah style: capture the facing pit, extra turn on landing in own store
//! - The game ends when either row is empty; leftovers go to their owner

mod board;
mod eval;
mod rules;

pub use board::{
    opposite_pit, pit_owner, pit_range, store_index, SowingMove, SowingState, PITS_PER_SIDE,
    SLOT_COUNT,
};
pub use eval::SowingEvaluator;
pub use rules::SowingRules;
