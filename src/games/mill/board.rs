//! Mill board graph, phases, moves and state.
//!
//! ## Point Layout
//!
//! ```text
//!  0-----------1-----------2
//!  |           |           |
//!  |   8-------9------10   |
//!  |   |       |       |   |
//!  |   |  16--17--18   |   |
//!  |   |   |       |   |   |
//!  7--15--23      19--11---3
//!  |   |   |       |   |   |
//!  |   |  22--21--20   |   |
//!  |   |       |       |   |
//!  |  14------13------12   |
//!  |           |           |
//!  6-----------5-----------4
//! ```
//!
//! Three rings of eight points, numbered clockwise from the top-left corner.
//! Midpoints (odd ring positions) link to the same position on the
//! neighbouring rings.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{captured_by, CaptureHistory, Side, SideMap};
use crate::rules::GameResult;

/// Points on the board.
pub const POINT_COUNT: usize = 24;

const RING_SIZE: usize = 8;
const RING_COUNT: usize = 3;

/// Every three-in-a-row line.
pub const MILLS: [[usize; 3]; 16] = [
    [0, 1, 2],
    [2, 3, 4],
    [4, 5, 6],
    [6, 7, 0],
    [8, 9, 10],
    [10, 11, 12],
    [12, 13, 14],
    [14, 15, 8],
    [16, 17, 18],
    [18, 19, 20],
    [20, 21, 22],
    [22, 23, 16],
    [1, 9, 17],
    [3, 11, 19],
    [5, 13, 21],
    [7, 15, 23],
];

/// Points joined to `point` by a line, ascending.
#[must_use]
pub fn neighbors(point: usize) -> SmallVec<[usize; 4]> {
    let ring = point / RING_SIZE;
    let pos = point % RING_SIZE;
    let base = ring * RING_SIZE;

    let mut out: SmallVec<[usize; 4]> = SmallVec::new();
    out.push(base + (pos + RING_SIZE - 1) % RING_SIZE);
    out.push(base + (pos + 1) % RING_SIZE);
    if pos % 2 == 1 {
        if ring > 0 {
            out.push(point - RING_SIZE);
        }
        if ring + 1 < RING_COUNT {
            out.push(point + RING_SIZE);
        }
    }
    out.sort_unstable();
    out
}

/// Mills passing through `point` (always two).
#[must_use]
pub fn mills_through(point: usize) -> SmallVec<[[usize; 3]; 2]> {
    MILLS.iter().filter(|mill| mill.contains(&point)).copied().collect()
}

/// Game phase for the side to move.
///
/// The `*MustCapture` forms mean the side to move has just closed a mill and
/// owes a capture; nothing else is accepted until it is made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MillPhase {
    Placement,
    PlacementMustCapture,
    Movement,
    MovementMustCapture,
    Flying,
    FlyingMustCapture,
}

impl MillPhase {
    /// True while a capture is owed.
    #[must_use]
    pub const fn must_capture(self) -> bool {
        matches!(
            self,
            MillPhase::PlacementMustCapture
                | MillPhase::MovementMustCapture
                | MillPhase::FlyingMustCapture
        )
    }

    /// The phase with the pending capture cleared.
    #[must_use]
    pub const fn base(self) -> Self {
        match self {
            MillPhase::Placement | MillPhase::PlacementMustCapture => MillPhase::Placement,
            MillPhase::Movement | MillPhase::MovementMustCapture => MillPhase::Movement,
            MillPhase::Flying | MillPhase::FlyingMustCapture => MillPhase::Flying,
        }
    }

    /// The must-capture form of this phase.
    #[must_use]
    pub const fn with_capture(self) -> Self {
        match self.base() {
            MillPhase::Placement => MillPhase::PlacementMustCapture,
            MillPhase::Movement => MillPhase::MovementMustCapture,
            _ => MillPhase::FlyingMustCapture,
        }
    }
}

/// What a mill move does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MillAction {
    /// Put a piece from hand on an empty point.
    Place { to: usize },
    /// Move a piece along a line, or anywhere while flying.
    Slide { from: usize, to: usize },
    /// Remove an opponent piece after closing a mill.
    Capture { at: usize },
}

/// A mill move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MillMove {
    /// Side making the move.
    pub side: Side,
    /// The action taken.
    pub action: MillAction,
}

impl MillMove {
    /// Place a piece.
    #[must_use]
    pub const fn place(side: Side, to: usize) -> Self {
        Self { side, action: MillAction::Place { to } }
    }

    /// Slide or fly a piece.
    #[must_use]
    pub const fn slide(side: Side, from: usize, to: usize) -> Self {
        Self { side, action: MillAction::Slide { from, to } }
    }

    /// Capture an opponent piece.
    #[must_use]
    pub const fn capture(side: Side, at: usize) -> Self {
        Self { side, action: MillAction::Capture { at } }
    }

    /// True for capture moves.
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        matches!(self.action, MillAction::Capture { .. })
    }

    /// The point a selection refers to: the origin of a slide, otherwise the
    /// target point.
    #[must_use]
    pub const fn anchor(&self) -> usize {
        match self.action {
            MillAction::Place { to } => to,
            MillAction::Slide { from, .. } => from,
            MillAction::Capture { at } => at,
        }
    }
}

impl std::fmt::Display for MillMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.action {
            MillAction::Place { to } => write!(f, "{} places at {}", self.side, to),
            MillAction::Slide { from, to } => write!(f, "{} moves {}-{}", self.side, from, to),
            MillAction::Capture { at } => write!(f, "{} captures {}", self.side, at),
        }
    }
}

/// Mill game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MillState {
    pub(crate) points: [Option<Side>; POINT_COUNT],
    pub(crate) to_move: Side,
    pub(crate) phase: MillPhase,
    pub(crate) in_hand: SideMap<u8>,
    pub(crate) selected: Option<usize>,
    pub(crate) valid_moves: Vec<MillMove>,
    pub(crate) result: Option<GameResult>,
    pub(crate) captures: CaptureHistory,
    pub(crate) last_move: Option<MillMove>,
    pub(crate) first_mill: Option<Side>,
    pub(crate) quiet_plies: u16,
}

impl MillState {
    /// Owner of a point.
    #[must_use]
    pub fn owner(&self, point: usize) -> Option<Side> {
        self.points.get(point).copied().flatten()
    }

    /// All points.
    #[must_use]
    pub fn points(&self) -> &[Option<Side>; POINT_COUNT] {
        &self.points
    }

    /// Pieces a side has on the board.
    #[must_use]
    pub fn on_board(&self, side: Side) -> u8 {
        self.points.iter().filter(|&&p| p == Some(side)).count() as u8
    }

    /// Pieces a side has yet to place.
    #[must_use]
    pub fn in_hand(&self, side: Side) -> u8 {
        self.in_hand[side]
    }

    /// Pieces on the board plus pieces in hand.
    #[must_use]
    pub fn material(&self, side: Side) -> u8 {
        self.on_board(side) + self.in_hand[side]
    }

    /// Whether the piece on `point` sits in a closed mill of its owner.
    #[must_use]
    pub fn in_mill(&self, point: usize) -> bool {
        match self.owner(point) {
            Some(side) => mills_through(point)
                .iter()
                .any(|mill| mill.iter().all(|&p| self.points[p] == Some(side))),
            None => false,
        }
    }

    /// Closed mills owned by a side.
    #[must_use]
    pub fn mill_count(&self, side: Side) -> usize {
        MILLS
            .iter()
            .filter(|mill| mill.iter().all(|&p| self.points[p] == Some(side)))
            .count()
    }

    /// Side to move.
    #[must_use]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Phase of the side to move.
    #[must_use]
    pub fn phase(&self) -> MillPhase {
        self.phase
    }

    /// True while the side to move owes a capture.
    #[must_use]
    pub fn must_capture(&self) -> bool {
        self.phase.must_capture()
    }

    /// Point highlighted by the last selection.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Destinations reachable from the selected point.
    #[must_use]
    pub fn valid_destinations(&self) -> Vec<usize> {
        let Some(point) = self.selected else {
            return Vec::new();
        };
        self.valid_moves
            .iter()
            .filter_map(|mv| match mv.action {
                MillAction::Slide { from, to } if from == point => Some(to),
                _ => None,
            })
            .collect()
    }

    /// Every legal move for the side to move.
    #[must_use]
    pub fn valid_moves(&self) -> &[MillMove] {
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
    pub fn last_move(&self) -> Option<MillMove> {
        self.last_move
    }

    /// The side that closed the first mill of the game.
    #[must_use]
    pub fn first_mill(&self) -> Option<Side> {
        self.first_mill
    }

    /// Consecutive capture-free plies since placement ended.
    #[must_use]
    pub fn quiet_plies(&self) -> u16 {
        self.quiet_plies
    }
}
