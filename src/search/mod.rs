//! Adversarial search for the board-game AIs.
//!
//! ## Overview
//!
//! - **Minimax with alpha-beta pruning** over any [`RulesEngine`](crate::rules::RulesEngine)
//! - **Pluggable evaluators** via the [`Evaluator`] trait
//! - **Difficulty tiers** mapped to search depth by [`SearchConfig`]
//! - **Deterministic**: the same (state, player, depth) always yields the same move
//!
//! ## Usage
//!
//! ```rust
//! use boardstake::core::{Side, SowingConfig};
//! use boardstake::games::sowing::{SowingEvaluator, SowingRules};
//! use boardstake::rules::RulesEngine;
//! use boardstake::search::MinimaxSearch;
//!
//! let rules = SowingRules::new(SowingConfig::default());
//! let state = rules.initial_state();
//!
//! let mut search = MinimaxSearch::new(rules, SowingEvaluator);
//! let mv = search.best_move(&state, Side::First, 3);
//! assert!(mv.is_some());
//! ```

pub mod config;
pub mod minimax;
pub mod random;
pub mod stats;

pub use config::{Difficulty, DifficultyDepths, SearchConfig};
pub use minimax::{best_move, terminal_score, Evaluator, MinimaxSearch, Score, WIN_SCORE};
pub use random::{playout, RandomPlayer};
pub use stats::SearchStats;
