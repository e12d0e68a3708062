//! Rules engine trait for game implementations.
//!
//! Games implement `RulesEngine` to define their rules:
//! - Which side is to move
//! - What moves are legal, in a fixed generation order
//! - How moves transform state
//! - Win/loss/draw conditions

use serde::{Deserialize, Serialize};

use crate::core::{MoveError, Side};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    /// Single winner by the rules.
    Winner(Side),
    /// Draw (no winner).
    Draw,
    /// One side abandoned or timed out; the other side wins.
    Forfeit {
        /// The forfeiting side.
        loser: Side,
    },
}

impl GameResult {
    /// The winning side, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match self {
            GameResult::Winner(side) => Some(*side),
            GameResult::Forfeit { loser } => Some(loser.opponent()),
            GameResult::Draw => None,
        }
    }

    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        self.winner() == Some(side)
    }

    /// True when the game ended by forfeit rather than by the rules.
    #[must_use]
    pub fn is_forfeit(&self) -> bool {
        matches!(self, GameResult::Forfeit { .. })
    }
}

/// Rules engine trait.
///
/// The search engine only talks to games through this trait.
///
/// ## Implementation Notes
///
/// - `legal_moves`: return moves in a stable order; search tie-breaks rely on it
/// - `play`: trusted transition for moves produced by `legal_moves`
/// - `apply_move`: validated transition for untrusted input
/// - `result`: `None` while the game continues
pub trait RulesEngine {
    /// Game state snapshot.
    type State: Clone;

    /// Move type.
    type Move: Clone + PartialEq + std::fmt::Debug;

    /// Create the starting position.
    fn initial_state(&self) -> Self::State;

    /// Side whose move it is.
    fn side_to_move(&self, state: &Self::State) -> Side;

    /// All legal moves for the side to move. Empty once the game is over.
    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Apply a move known to be legal.
    fn play(&self, state: &Self::State, mv: &Self::Move) -> Self::State;

    /// Validate and apply a move.
    ///
    /// On error the input state is untouched.
    fn apply_move(&self, state: &Self::State, mv: &Self::Move) -> Result<Self::State, MoveError>;

    /// Final result, or `None` if the game continues.
    fn result(&self, state: &Self::State) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Check if the game is over.
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.result(state).is_some()
    }
}
