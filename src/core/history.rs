//! Capture history shared by every game variant.
//!
//! Captures are recorded in the order they happen. The history is an
//! `im::Vector` so cloning a state during search stays O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::Side;

/// One capture: who captured, how much, and where.
///
/// `count` is seeds for the sowing game and pieces (always 1) for the
/// draughts and mill games. `position` is the board index that was emptied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// The capturing side.
    pub side: Side,

    /// Seeds or pieces taken.
    pub count: u16,

    /// Board index the material was taken from.
    pub position: usize,
}

impl CaptureEvent {
    /// Create a new capture event.
    #[must_use]
    pub const fn new(side: Side, count: u16, position: usize) -> Self {
        Self {
            side,
            count,
            position,
        }
    }
}

/// Ordered capture log.
pub type CaptureHistory = Vector<CaptureEvent>;

/// Total material captured by `side` over the whole history.
#[must_use]
pub fn captured_by(history: &CaptureHistory, side: Side) -> u32 {
    history
        .iter()
        .filter(|event| event.side == side)
        .map(|event| u32::from(event.count))
        .sum()
}
