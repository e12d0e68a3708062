//! # boardstake
//!
//! Traditional board-game engines with minimax AI opponents, plus a wager
//! layer that settles bets against finished matches.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: every move returns a new state; a rejected move
//!    leaves the input untouched and finished games accept nothing.
//!
//! 2. **Variant-Agnostic Search**: the AI only sees the `RulesEngine` and
//!    `Evaluator` traits. Same inputs, same move.
//!
//! 3. **Configuration Over Convention**: rule options, difficulty depths and
//!    odds tables are data, loadable from TOML.
//!
//! ## Modules
//!
//! - `core`: sides, RNG, capture history, configuration, move errors
//! - `rules`: `RulesEngine` trait and game results
//! - `games`: sowing, draughts and mill engines plus the `Game` dispatcher
//! - `search`: minimax with alpha-beta pruning, difficulty tiers
//! - `session`: match modes and the synchronous turn loop
//! - `wager`: bet placement, odds and settlement
//! - `settings`: TOML settings loader

pub mod core;
pub mod games;
pub mod rules;
pub mod search;
pub mod session;
pub mod settings;
pub mod wager;

// Re-export commonly used types
pub use crate::core::{
    CaptureEvent, CaptureHistory, GameConfig, GameRng, MoveError, Side, SideMap, Variant,
};

pub use crate::games::{Game, GameState, Move, SearchOutcome};

pub use crate::rules::{GameResult, RulesEngine};

pub use crate::search::{Difficulty, Evaluator, MinimaxSearch, Score, SearchConfig, SearchStats};

pub use crate::session::{Controller, MatchMode, Session, SessionId};

pub use crate::settings::{Settings, SettingsError};

pub use crate::wager::{
    BalanceStore, BetRecord, BetStatus, BetType, InMemoryLedger, LedgerError, OddsTable,
    Settlement, WagerBook, WagerError,
};
