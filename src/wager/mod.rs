//! Wagers on match outcomes.
//!
//! ## Flow
//!
//! 1. [`WagerBook::open_session`] registers a live session
//! 2. [`WagerBook::place_bet`] validates, prices and debits a stake
//! 3. [`WagerBook::settle_bets`] resolves every active bet once the game ends
//!
//! Odds come from an [`OddsTable`]; balances live behind the
//! [`BalanceStore`] trait.
//!
//! ```
//! use boardstake::core::{GameConfig, Side, Variant};
//! use boardstake::search::SearchConfig;
//! use boardstake::session::{MatchMode, Session};
//! use boardstake::wager::{BalanceStore, BetType, InMemoryLedger, OddsTable, WagerBook};
//!
//! let book = WagerBook::new(InMemoryLedger::new().with_balance("ann", 500), OddsTable::default());
//! let mut session = Session::new(
//!     "match-1",
//!     &GameConfig::default_for(Variant::Mill),
//!     MatchMode::PeerVsPeer,
//!     SearchConfig::default(),
//! );
//! book.open_session(&session).unwrap();
//! book.place_bet(&session, "ann", BetType::Winner, "second", 100).unwrap();
//!
//! session.forfeit(Side::First).unwrap();
//! let settlement = book.settle_bets("match-1", session.state()).unwrap();
//! assert_eq!(settlement.total_paid(), 181);
//! assert_eq!(book.ledger().get_balance("ann").unwrap(), 581);
//! ```

mod bet;
mod error;
mod ledger;
mod odds;
mod settlement;

pub use bet::{BetId, BetRecord, BetSelection, BetStatus, BetType, UserId};
pub use error::WagerError;
pub use ledger::{BalanceStore, InMemoryLedger, LedgerError};
pub use odds::{odds_cents, potential_win, round_odds, BaseOdds, DifficultyMultipliers, OddsTable};
pub use settlement::{Settlement, SettlementFailure, WagerBook};
