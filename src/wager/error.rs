//! Wager errors.

use derive_more::{Display, Error, From};

use crate::core::Variant;
use crate::session::SessionId;

use super::bet::{BetId, BetType};
use super::ledger::LedgerError;

/// Error returned by bet placement and settlement.
///
/// A failed operation leaves the book and the ledger unchanged.
#[derive(Debug, Clone, PartialEq, Display, Error, From)]
pub enum WagerError {
    /// Stake outside the configured limits.
    #[display("Stake {stake} is outside the allowed range [{min}, {max}]")]
    InsufficientStake { stake: u64, min: u64, max: u64 },

    /// The variant offers no odds for this bet type.
    #[display("Bet type {bet_type} is not offered for {variant}")]
    UnknownBetType { variant: Variant, bet_type: BetType },

    /// The bet was already won or lost.
    #[display("Bet {_0} is already settled")]
    BetAlreadySettled(#[error(not(source))] BetId),

    /// No session with this ID was opened in the book.
    #[display("Unknown session {_0}")]
    UnknownSession(#[error(not(source))] SessionId),

    /// The session's game is over; no further bets are taken.
    #[display("Session {_0} is closed for betting")]
    SessionClosed(#[error(not(source))] SessionId),

    /// The bet value does not parse for its bet type.
    #[display("Invalid bet value '{value}': {reason}")]
    InvalidBetValue { value: String, reason: String },

    /// The user cannot cover the stake.
    #[display("Balance {balance} cannot cover stake {stake}")]
    InsufficientBalance { balance: u64, stake: u64 },

    /// The final state belongs to a different game than the session.
    #[display("Session plays {expected}, final state is {actual}")]
    VariantMismatch { expected: Variant, actual: Variant },

    /// Settlement needs a finished game.
    #[display("Game is not over")]
    GameNotOver,

    /// No bet with this ID.
    #[display("Unknown bet {_0}")]
    UnknownBet(#[error(not(source))] BetId),

    /// The balance store failed.
    #[display("{_0}")]
    #[from]
    Ledger(#[error(source)] LedgerError),
}
