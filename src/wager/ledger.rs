//! Balance ledger seam and an in-memory implementation.

use std::sync::{Arc, Mutex};

use derive_more::{Display, Error};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

/// Ledger failure with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Ledger error: {} at {}:{}", message, file, line)]
pub struct LedgerError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl LedgerError {
    /// Creates a new ledger error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// User balances, shared by every session.
///
/// Implementations must make each `credit` and `debit` atomic so concurrent
/// settlements for the same user never lose an update.
pub trait BalanceStore: Send + Sync {
    /// Current balance (0 for unknown users).
    fn get_balance(&self, user: &str) -> Result<u64, LedgerError>;

    /// Add to a balance, returning the new balance.
    fn credit(&self, user: &str, amount: u64) -> Result<u64, LedgerError>;

    /// Remove from a balance, returning the new balance. Fails on overdraft.
    fn debit(&self, user: &str, amount: u64) -> Result<u64, LedgerError>;
}

impl<L: BalanceStore + ?Sized> BalanceStore for Arc<L> {
    fn get_balance(&self, user: &str) -> Result<u64, LedgerError> {
        (**self).get_balance(user)
    }

    fn credit(&self, user: &str, amount: u64) -> Result<u64, LedgerError> {
        (**self).credit(user, amount)
    }

    fn debit(&self, user: &str, amount: u64) -> Result<u64, LedgerError> {
        (**self).debit(user, amount)
    }
}

/// Balances in a mutex-guarded hash map.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<FxHashMap<String, u64>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed a user's balance.
    #[must_use]
    pub fn with_balance(self, user: impl Into<String>, amount: u64) -> Self {
        if let Ok(mut balances) = self.balances.lock() {
            balances.insert(user.into(), amount);
        }
        self
    }

    fn update<F>(&self, user: &str, f: F) -> Result<u64, LedgerError>
    where
        F: FnOnce(u64) -> Result<u64, LedgerError>,
    {
        let mut balances = self
            .balances
            .lock()
            .map_err(|e| LedgerError::new(format!("Ledger lock poisoned: {e}")))?;
        let entry = balances.entry(user.to_string()).or_insert(0);
        *entry = f(*entry)?;
        Ok(*entry)
    }
}

impl BalanceStore for InMemoryLedger {
    fn get_balance(&self, user: &str) -> Result<u64, LedgerError> {
        let balances = self
            .balances
            .lock()
            .map_err(|e| LedgerError::new(format!("Ledger lock poisoned: {e}")))?;
        Ok(balances.get(user).copied().unwrap_or(0))
    }

    #[instrument(skip(self))]
    fn credit(&self, user: &str, amount: u64) -> Result<u64, LedgerError> {
        let balance = self.update(user, |current| {
            current
                .checked_add(amount)
                .ok_or_else(|| LedgerError::new("Balance overflow"))
        })?;
        debug!(balance, "Credited");
        Ok(balance)
    }

    #[instrument(skip(self))]
    fn debit(&self, user: &str, amount: u64) -> Result<u64, LedgerError> {
        let balance = self.update(user, |current| {
            current.checked_sub(amount).ok_or_else(|| {
                LedgerError::new(format!("Insufficient balance: {current} < {amount}"))
            })
        })?;
        debug!(balance, "Debited");
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_debit() {
        let ledger = InMemoryLedger::new().with_balance("ann", 100);
        assert_eq!(ledger.get_balance("ann").unwrap(), 100);
        assert_eq!(ledger.get_balance("bob").unwrap(), 0);

        assert_eq!(ledger.credit("ann", 50).unwrap(), 150);
        assert_eq!(ledger.debit("ann", 120).unwrap(), 30);
        assert!(ledger.debit("ann", 31).is_err());
        assert_eq!(ledger.get_balance("ann").unwrap(), 30);
    }

    #[test]
    fn test_error_records_location() {
        let err = LedgerError::new("boom");
        assert!(err.file.ends_with("ledger.rs"));
        assert!(err.to_string().starts_with("Ledger error: boom at "));
    }

    #[test]
    fn test_concurrent_credits() {
        let ledger = Arc::new(InMemoryLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        ledger.credit("ann", 1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(ledger.get_balance("ann").unwrap(), 800);
    }
}
