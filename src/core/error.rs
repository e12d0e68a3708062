//! Move validation errors.
//!
//! Every rejected move is reported as a value. A rejected move never
//! changes the state it was validated against.

use derive_more::{Display, Error};

use super::player::Side;

/// Error returned when a move cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Illegal slot, piece or destination.
    #[display("Invalid move: {_0}")]
    InvalidMove(#[error(not(source))] String),

    /// The move was submitted for the side that is not to move.
    #[display("It's not {actual}'s turn ({expected} to move)")]
    NotYourTurn {
        /// Side to move.
        expected: Side,
        /// Side that attempted to move.
        actual: Side,
    },

    /// The game has already ended.
    #[display("Game is already over")]
    GameAlreadyOver,

    /// A mill was formed and the pending capture must be made first.
    #[display("A capture is required before any other move")]
    CaptureRequired,

    /// The move belongs to a different game variant than the state.
    #[display("Move does not belong to this game variant")]
    VariantMismatch,
}

impl MoveError {
    /// Shorthand for [`MoveError::InvalidMove`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        MoveError::InvalidMove(reason.into())
    }
}
