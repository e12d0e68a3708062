//! Bet placement and settlement against finished games.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rustc_hash::FxHashMap;
use tracing::{info, instrument, warn};

use crate::core::Variant;
use crate::games::GameState;
use crate::session::{MatchMode, Session, SessionId};

use super::bet::{BetId, BetRecord, BetSelection, BetStatus, BetType};
use super::error::WagerError;
use super::ledger::{BalanceStore, LedgerError};
use super::odds::{potential_win, OddsTable};

/// A winning bet whose credit failed. The bet stays active for retry.
#[derive(Clone, Debug, PartialEq)]
pub struct SettlementFailure {
    pub bet_id: BetId,
    pub error: LedgerError,
}

/// Outcome of one settlement batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settlement {
    /// Bets settled by this call, in placement order.
    pub settled: Vec<BetRecord>,
    /// Winning bets that could not be credited.
    pub failures: Vec<SettlementFailure>,
}

impl Settlement {
    /// Total credited by this batch.
    #[must_use]
    pub fn total_paid(&self) -> u64 {
        self.settled
            .iter()
            .filter(|bet| bet.status == BetStatus::Won)
            .map(|bet| bet.potential_win)
            .sum()
    }

    /// True if every winning bet was credited.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone, Debug)]
struct SessionEntry {
    variant: Variant,
    mode: MatchMode,
    closed: bool,
}

#[derive(Debug, Default)]
struct Book {
    sessions: FxHashMap<SessionId, SessionEntry>,
    bets: Vec<BetRecord>,
    next_id: BetId,
}

/// Bets for many sessions over one shared balance store.
///
/// All book mutations happen under one lock, so concurrent settlement calls
/// for the same session credit each winning bet once.
#[derive(Debug)]
pub struct WagerBook<L: BalanceStore> {
    ledger: L,
    odds: OddsTable,
    book: Mutex<Book>,
}

impl<L: BalanceStore> WagerBook<L> {
    /// Create a book over a balance store.
    pub fn new(ledger: L, odds: OddsTable) -> Self {
        Self {
            ledger,
            odds,
            book: Mutex::new(Book::default()),
        }
    }

    /// The balance store.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The odds in force.
    pub fn odds(&self) -> &OddsTable {
        &self.odds
    }

    fn lock(&self) -> Result<MutexGuard<'_, Book>, WagerError> {
        self.book
            .lock()
            .map_err(|e| WagerError::Ledger(LedgerError::new(format!("Book lock poisoned: {e}"))))
    }

    /// Register a session so bets can be placed on it.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub fn open_session(&self, session: &Session) -> Result<(), WagerError> {
        let mut book = self.lock()?;
        book.sessions.insert(
            session.id().to_string(),
            SessionEntry {
                variant: session.variant(),
                mode: session.mode(),
                closed: session.state().is_over(),
            },
        );
        info!(variant = %session.variant(), mode = session.mode().name(), "Session opened for betting");
        Ok(())
    }

    /// Place a bet on a live session.
    ///
    /// Checks run before anything changes: the session is registered and
    /// live, the stake is within limits, the bet type is offered, the value
    /// parses and the balance covers the stake. The stake is then debited.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub fn place_bet(
        &self,
        session: &Session,
        user: &str,
        bet_type: BetType,
        value: &str,
        stake: u64,
    ) -> Result<BetRecord, WagerError> {
        let mut book = self.lock()?;
        let entry = book
            .sessions
            .get(session.id())
            .cloned()
            .ok_or_else(|| WagerError::UnknownSession(session.id().to_string()))?;
        if entry.closed || session.state().is_over() {
            return Err(WagerError::SessionClosed(session.id().to_string()));
        }

        if stake < self.odds.min_stake || stake > self.odds.max_stake {
            return Err(WagerError::InsufficientStake {
                stake,
                min: self.odds.min_stake,
                max: self.odds.max_stake,
            });
        }

        if self.odds.base_odds(entry.variant, bet_type).is_none() {
            return Err(WagerError::UnknownBetType {
                variant: entry.variant,
                bet_type,
            });
        }

        let selection = BetSelection::parse(bet_type, value)?;
        let odds = self
            .odds
            .effective_odds(entry.variant, &entry.mode, &selection)
            .ok_or(WagerError::UnknownBetType {
                variant: entry.variant,
                bet_type,
            })?;

        let balance = self.ledger.get_balance(user)?;
        if balance < stake {
            return Err(WagerError::InsufficientBalance { balance, stake });
        }
        self.ledger.debit(user, stake)?;

        book.next_id += 1;
        let record = BetRecord {
            id: book.next_id,
            session_id: session.id().to_string(),
            user_id: user.to_string(),
            bet_type,
            bet_value: value.to_string(),
            selection,
            stake,
            odds,
            potential_win: potential_win(stake, odds),
            status: BetStatus::Active,
            created_at: Utc::now(),
            settled_at: None,
        };
        book.bets.push(record.clone());

        info!(bet_id = record.id, user, %bet_type, stake, odds, "Bet placed");
        Ok(record)
    }

    /// Settle every active bet of a session against its final state.
    ///
    /// Settled bets are skipped, so repeated calls pay nothing twice. A
    /// failed credit is reported in [`Settlement::failures`] and leaves that
    /// bet active; the rest of the batch still settles.
    #[instrument(skip(self, final_state))]
    pub fn settle_bets(
        &self,
        session_id: &str,
        final_state: &GameState,
    ) -> Result<Settlement, WagerError> {
        if !final_state.is_over() {
            return Err(WagerError::GameNotOver);
        }

        let mut book = self.lock()?;
        let entry = book
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| WagerError::UnknownSession(session_id.to_string()))?;
        check_variant(entry, final_state)?;
        entry.closed = true;

        let mut settlement = Settlement::default();
        for bet in book
            .bets
            .iter_mut()
            .filter(|bet| bet.session_id == session_id && bet.is_active())
        {
            match self.resolve(bet, final_state) {
                Ok(()) => settlement.settled.push(bet.clone()),
                Err(error) => {
                    warn!(bet_id = bet.id, %error, "Credit failed; bet left active");
                    settlement.failures.push(SettlementFailure {
                        bet_id: bet.id,
                        error,
                    });
                }
            }
        }

        info!(
            settled = settlement.settled.len(),
            failures = settlement.failures.len(),
            paid = settlement.total_paid(),
            "Settlement complete"
        );
        Ok(settlement)
    }

    /// Settle one bet, typically to retry a failed credit.
    #[instrument(skip(self, final_state))]
    pub fn settle_bet(&self, bet_id: BetId, final_state: &GameState) -> Result<BetRecord, WagerError> {
        if !final_state.is_over() {
            return Err(WagerError::GameNotOver);
        }

        let mut guard = self.lock()?;
        let book = &mut *guard;
        let bet = book
            .bets
            .iter_mut()
            .find(|bet| bet.id == bet_id)
            .ok_or(WagerError::UnknownBet(bet_id))?;
        if !bet.is_active() {
            return Err(WagerError::BetAlreadySettled(bet_id));
        }
        let entry = book
            .sessions
            .get(&bet.session_id)
            .ok_or_else(|| WagerError::UnknownSession(bet.session_id.clone()))?;
        check_variant(entry, final_state)?;

        self.resolve(bet, final_state)?;
        Ok(bet.clone())
    }

    /// Decide a bet and credit winnings. On a failed credit the bet is untouched.
    fn resolve(&self, bet: &mut BetRecord, final_state: &GameState) -> Result<(), LedgerError> {
        let won = bet.selection.is_won(final_state);
        if won {
            self.ledger.credit(&bet.user_id, bet.potential_win)?;
        }
        bet.status = if won { BetStatus::Won } else { BetStatus::Lost };
        bet.settled_at = Some(Utc::now());
        Ok(())
    }

    /// Every bet on a session, in placement order.
    pub fn bets(&self, session_id: &str) -> Vec<BetRecord> {
        self.lock()
            .map(|book| {
                book.bets
                    .iter()
                    .filter(|bet| bet.session_id == session_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up one bet.
    pub fn bet(&self, bet_id: BetId) -> Option<BetRecord> {
        self.lock()
            .ok()
            .and_then(|book| book.bets.iter().find(|bet| bet.id == bet_id).cloned())
    }
}

fn check_variant(entry: &SessionEntry, final_state: &GameState) -> Result<(), WagerError> {
    if final_state.variant() != entry.variant {
        warn!(expected = %entry.variant, actual = %final_state.variant(), "Final state from another game");
        return Err(WagerError::VariantMismatch {
            expected: entry.variant,
            actual: final_state.variant(),
        });
    }
    Ok(())
}
