//! Sowing board layout, moves and state.
//!
//! ## Slot Layout
//!
//! ```text
//!        12 11 10  9  8  7        <- Second's pits
//!    13                    6      <- stores (Second left, First right)
//!         0  1  2  3  4  5        <- First's pits
//! ```
//!
//! Sowing runs in increasing index order, wrapping from 13 to 0. The pit
//! facing `pit` is `12 - pit`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::{captured_by, CaptureHistory, Side};
use crate::rules::GameResult;

/// Pits per side.
pub const PITS_PER_SIDE: usize = 6;

/// Pits plus stores.
pub const SLOT_COUNT: usize = 14;

/// Index of a side's store.
#[must_use]
pub const fn store_index(side: Side) -> usize {
    match side {
        Side::First => 6,
        Side::Second => 13,
    }
}

/// Slot indices of a side's pits.
#[must_use]
pub const fn pit_range(side: Side) -> Range<usize> {
    match side {
        Side::First => 0..6,
        Side::Second => 7..13,
    }
}

/// Owner of a pit, `None` for stores and out-of-range indices.
#[must_use]
pub fn pit_owner(slot: usize) -> Option<Side> {
    Side::BOTH.into_iter().find(|&side| pit_range(side).contains(&slot))
}

/// Pit directly across the board.
#[must_use]
pub const fn opposite_pit(pit: usize) -> usize {
    12 - pit
}

/// Sow the seeds of one pit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SowingMove {
    /// Side making the move.
    pub side: Side,
    /// Slot index of the pit to empty.
    pub pit: usize,
}

impl SowingMove {
    /// Create a new move.
    #[must_use]
    pub const fn new(side: Side, pit: usize) -> Self {
        Self { side, pit }
    }
}

impl std::fmt::Display for SowingMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} sows pit {}", self.side, self.pit)
    }
}

/// Sowing game state.
///
/// Only `SowingRules` creates or transforms states, so `valid_moves` and
/// `result` always agree with the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SowingState {
    pub(crate) slots: [u16; SLOT_COUNT],
    pub(crate) to_move: Side,
    pub(crate) selected: Option<usize>,
    pub(crate) valid_moves: Vec<SowingMove>,
    pub(crate) result: Option<GameResult>,
    pub(crate) captures: CaptureHistory,
    pub(crate) last_move: Option<SowingMove>,
}

impl SowingState {
    /// All slots, pits and stores.
    #[must_use]
    pub fn slots(&self) -> &[u16; SLOT_COUNT] {
        &self.slots
    }

    /// Seeds in one slot.
    #[must_use]
    pub fn seeds(&self, slot: usize) -> u16 {
        self.slots[slot]
    }

    /// Seeds in a side's store.
    #[must_use]
    pub fn store(&self, side: Side) -> u16 {
        self.slots[store_index(side)]
    }

    /// Seeds still in a side's pits.
    #[must_use]
    pub fn seeds_in_pits(&self, side: Side) -> u16 {
        self.slots[pit_range(side)].iter().sum()
    }

    /// Seeds on the whole board, stores included.
    #[must_use]
    pub fn total_seeds(&self) -> u32 {
        self.slots.iter().map(|&s| u32::from(s)).sum()
    }

    /// Side to move.
    #[must_use]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Pit highlighted by the last selection, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Every legal move for the side to move.
    #[must_use]
    pub fn valid_moves(&self) -> &[SowingMove] {
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

    /// Seeds captured by a side (end-of-game sweeps excluded).
    #[must_use]
    pub fn captured_by(&self, side: Side) -> u32 {
        captured_by(&self.captures, side)
    }

    /// Most recent move.
    #[must_use]
    pub fn last_move(&self) -> Option<SowingMove> {
        self.last_move
    }
}

impl std::fmt::Display for SowingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let top: Vec<String> = pit_range(Side::Second)
            .rev()
            .map(|i| format!("{:>2}", self.slots[i]))
            .collect();
        let bottom: Vec<String> = pit_range(Side::First)
            .map(|i| format!("{:>2}", self.slots[i]))
            .collect();
        writeln!(f, "    {}", top.join(" "))?;
        writeln!(
            f,
            "{:>2}{}{:>2}",
            self.store(Side::Second),
            " ".repeat(17),
            self.store(Side::First)
        )?;
        write!(f, "    {}", bottom.join(" "))
    }
}
