//! Odds tables.
//!
//! Base odds are data keyed by (variant, bet type). Effective odds apply a
//! mode multiplier on top:
//!
//! - human vs AI: a per-difficulty multiplier, one table for backing the
//!   human side and one for backing the AI side
//! - peer vs peer: a house discount
//! - AI vs AI: an uncertainty premium
//!
//! Effective odds are rounded to two decimals.

use serde::{Deserialize, Serialize};

use crate::core::Variant;
use crate::search::Difficulty;
use crate::session::{Controller, MatchMode};

use super::bet::{BetSelection, BetType};

/// Base odds for one (variant, bet type) pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseOdds {
    pub variant: Variant,
    pub bet_type: BetType,
    pub odds: f64,
}

impl BaseOdds {
    pub const fn new(variant: Variant, bet_type: BetType, odds: f64) -> Self {
        Self {
            variant,
            bet_type,
            odds,
        }
    }
}

/// Multiplier per difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyMultipliers {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
    pub expert: f64,
}

impl DifficultyMultipliers {
    /// Multiplier for a tier.
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Expert => self.expert,
        }
    }
}

/// Odds and stake limits for a wager book.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OddsTable {
    /// Smallest accepted stake.
    pub min_stake: u64,
    /// Largest accepted stake.
    pub max_stake: u64,
    /// Peer vs peer multiplier.
    pub peer_discount: f64,
    /// AI vs AI multiplier.
    pub ai_premium: f64,
    /// Human vs AI, bet backs the human: harder AI pays more.
    pub backing_human: DifficultyMultipliers,
    /// Human vs AI, bet backs the AI: harder AI pays less.
    pub backing_ai: DifficultyMultipliers,
    /// Base odds; a missing pair means the bet type is not offered.
    pub base: Vec<BaseOdds>,
}

impl Default for OddsTable {
    fn default() -> Self {
        use BetType::*;
        use Variant::*;

        Self {
            min_stake: 10,
            max_stake: 100_000,
            peer_discount: 0.95,
            ai_premium: 1.10,
            base: vec![
                BaseOdds::new(Sowing, Winner, 1.9),
                BaseOdds::new(Sowing, CaptureThreshold, 2.5),
                BaseOdds::new(Sowing, PerfectGame, 6.0),
                BaseOdds::new(Draughts, Winner, 1.9),
                BaseOdds::new(Draughts, CaptureThreshold, 2.2),
                BaseOdds::new(Draughts, PerfectGame, 8.0),
                BaseOdds::new(Mill, Winner, 1.9),
                BaseOdds::new(Mill, CaptureThreshold, 2.2),
                BaseOdds::new(Mill, FirstMill, 1.8),
                BaseOdds::new(Mill, PerfectGame, 10.0),
            ],
            backing_human: DifficultyMultipliers {
                easy: 1.0,
                medium: 1.2,
                hard: 1.5,
                expert: 2.0,
            },
            backing_ai: DifficultyMultipliers {
                easy: 1.0,
                medium: 0.9,
                hard: 0.8,
                expert: 0.7,
            },
        }
    }
}

/// Round odds to two decimals.
#[must_use]
pub fn round_odds(odds: f64) -> f64 {
    (odds * 100.0).round() / 100.0
}

/// Odds in integer hundredths, e.g. `2.01` is `201`.
#[must_use]
pub fn odds_cents(odds: f64) -> u64 {
    (odds * 100.0).round() as u64
}

/// Payout for a winning stake: `floor(stake * odds)`, computed in
/// hundredths so odds like `2.01` pay exactly. Saturates at `u64::MAX`.
#[must_use]
pub fn potential_win(stake: u64, odds: f64) -> u64 {
    let exact = u128::from(stake) * u128::from(odds_cents(odds)) / 100;
    u64::try_from(exact).unwrap_or(u64::MAX)
}

impl OddsTable {
    /// Set the stake limits.
    #[must_use]
    pub fn with_stake_limits(mut self, min: u64, max: u64) -> Self {
        self.min_stake = min;
        self.max_stake = max;
        self
    }

    /// Add or replace base odds for a pair.
    #[must_use]
    pub fn with_base_odds(mut self, variant: Variant, bet_type: BetType, odds: f64) -> Self {
        self.base
            .retain(|b| !(b.variant == variant && b.bet_type == bet_type));
        self.base.push(BaseOdds::new(variant, bet_type, odds));
        self
    }

    /// Remove a bet type from a variant's offer.
    #[must_use]
    pub fn without(mut self, variant: Variant, bet_type: BetType) -> Self {
        self.base
            .retain(|b| !(b.variant == variant && b.bet_type == bet_type));
        self
    }

    /// Base odds for a pair, `None` if not offered.
    #[must_use]
    pub fn base_odds(&self, variant: Variant, bet_type: BetType) -> Option<f64> {
        self.base
            .iter()
            .rev()
            .find(|b| b.variant == variant && b.bet_type == bet_type)
            .map(|b| b.odds)
    }

    /// Mode multiplier for a selection.
    #[must_use]
    pub fn mode_multiplier(&self, mode: &MatchMode, selection: &BetSelection) -> f64 {
        match mode {
            MatchMode::HumanVsAi { difficulty, .. } => match selection.backed_side() {
                Some(side) => match mode.controller(side) {
                    Controller::Human => self.backing_human.get(*difficulty),
                    Controller::Ai(_) => self.backing_ai.get(*difficulty),
                },
                None => 1.0,
            },
            MatchMode::PeerVsPeer => self.peer_discount,
            MatchMode::AiVsAi { .. } => self.ai_premium,
        }
    }

    /// Effective odds, rounded; `None` if the bet type is not offered.
    #[must_use]
    pub fn effective_odds(
        &self,
        variant: Variant,
        mode: &MatchMode,
        selection: &BetSelection,
    ) -> Option<f64> {
        let base = self.base_odds(variant, selection.bet_type())?;
        Some(round_odds(base * self.mode_multiplier(mode, selection)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;

    fn winner(side: Side) -> BetSelection {
        BetSelection::Winner { side: Some(side) }
    }

    #[test]
    fn test_rounding_and_payout() {
        assert_eq!(round_odds(1.806), 1.81);
        assert_eq!(round_odds(2.0899), 2.09);
        assert_eq!(potential_win(100, 1.81), 181);
        assert_eq!(potential_win(15, 1.9), 28);
    }

    #[test]
    fn test_payout_is_exact_for_decimal_odds() {
        for (odds, at_100, at_1000) in [(2.01, 201, 2_010), (1.15, 115, 1_150), (4.35, 435, 4_350)] {
            assert_eq!(potential_win(100, odds), at_100, "{odds}");
            assert_eq!(potential_win(1_000, odds), at_1000, "{odds}");
        }
        assert_eq!(odds_cents(2.01), 201);
        assert_eq!(potential_win(u64::MAX, 2.0), u64::MAX);
    }

    #[test]
    fn test_mode_multipliers() {
        let table = OddsTable::default().with_base_odds(Variant::Sowing, BetType::Winner, 2.0);
        let human_vs_expert = MatchMode::HumanVsAi {
            human: Side::First,
            difficulty: Difficulty::Expert,
        };
        assert_eq!(
            table.effective_odds(Variant::Sowing, &human_vs_expert, &winner(Side::First)),
            Some(4.0)
        );
        assert_eq!(
            table.effective_odds(Variant::Sowing, &human_vs_expert, &winner(Side::Second)),
            Some(1.4)
        );
        assert_eq!(
            table.effective_odds(Variant::Sowing, &MatchMode::PeerVsPeer, &winner(Side::First)),
            Some(1.9)
        );
        let ai_vs_ai = MatchMode::AiVsAi {
            first: Difficulty::Easy,
            second: Difficulty::Hard,
        };
        assert_eq!(
            table.effective_odds(Variant::Sowing, &ai_vs_ai, &winner(Side::First)),
            Some(2.2)
        );
    }

    #[test]
    fn test_harder_ai_pays_more_for_human() {
        let table = OddsTable::default();
        let odds: Vec<f64> = Difficulty::ALL
            .into_iter()
            .filter_map(|difficulty| {
                let mode = MatchMode::HumanVsAi {
                    human: Side::Second,
                    difficulty,
                };
                table.effective_odds(Variant::Draughts, &mode, &winner(Side::Second))
            })
            .collect();
        assert!(odds.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_offer_is_per_variant() {
        let table = OddsTable::default();
        let first_mill = BetSelection::FirstMill { side: Side::First };
        assert!(table
            .effective_odds(Variant::Sowing, &MatchMode::PeerVsPeer, &first_mill)
            .is_none());
        assert!(table
            .effective_odds(Variant::Mill, &MatchMode::PeerVsPeer, &first_mill)
            .is_some());

        let table = table.without(Variant::Mill, BetType::FirstMill);
        assert!(table.base_odds(Variant::Mill, BetType::FirstMill).is_none());
        assert_eq!(table.base.len(), 9);
    }

    #[test]
    fn test_toml_round_trip() {
        let table = OddsTable::default().with_base_odds(Variant::Sowing, BetType::Winner, 2.0);
        let text = toml::to_string(&table).unwrap();
        let back: OddsTable = toml::from_str(&text).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.base_odds(Variant::Sowing, BetType::Winner), Some(2.0));
    }
}
