//! Bet types, selections and records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Side;
use crate::games::GameState;
use crate::rules::GameResult;
use crate::session::SessionId;

use super::error::WagerError;

/// Bet identifier, unique within a book.
pub type BetId = u64;

/// Identifier of the user placing a bet.
pub type UserId = String;

/// Kind of outcome a bet is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    /// Outright winner or a draw.
    Winner,
    /// A side captures at least a given amount.
    CaptureThreshold,
    /// A side closes the first mill.
    FirstMill,
    /// A side wins by the rules without losing any material.
    PerfectGame,
}

impl BetType {
    /// Every bet type.
    pub const ALL: [BetType; 4] = [
        BetType::Winner,
        BetType::CaptureThreshold,
        BetType::FirstMill,
        BetType::PerfectGame,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BetType::Winner => "winner",
            BetType::CaptureThreshold => "capture_threshold",
            BetType::FirstMill => "first_mill",
            BetType::PerfectGame => "perfect_game",
        }
    }
}

impl std::fmt::Display for BetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for BetType {
    type Err = WagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BetType::ALL
            .into_iter()
            .find(|t| t.name() == s.trim())
            .ok_or_else(|| WagerError::InvalidBetValue {
                value: s.to_string(),
                reason: "unknown bet type".to_string(),
            })
    }
}

/// Lifecycle of a bet. Active bets are settled exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetStatus {
    Active,
    Won,
    Lost,
}

/// A parsed bet value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BetSelection {
    /// `Some(side)` backs a winner, `None` backs a draw.
    Winner { side: Option<Side> },
    CaptureThreshold { side: Side, threshold: u32 },
    FirstMill { side: Side },
    PerfectGame { side: Side },
}

fn parse_side(value: &str) -> Result<Side, WagerError> {
    Side::from_label(value.trim()).ok_or_else(|| WagerError::InvalidBetValue {
        value: value.to_string(),
        reason: "expected 'first' or 'second'".to_string(),
    })
}

impl BetSelection {
    /// Parse a free-form bet value for a bet type.
    ///
    /// - winner: `first`, `second` or `draw`
    /// - capture threshold: `<side>:<count>`
    /// - first mill, perfect game: `<side>`
    pub fn parse(bet_type: BetType, value: &str) -> Result<Self, WagerError> {
        match bet_type {
            BetType::Winner => match value.trim() {
                "draw" => Ok(BetSelection::Winner { side: None }),
                other => Ok(BetSelection::Winner {
                    side: Some(parse_side(other)?),
                }),
            },
            BetType::CaptureThreshold => {
                let (side, count) =
                    value.split_once(':').ok_or_else(|| WagerError::InvalidBetValue {
                        value: value.to_string(),
                        reason: "expected '<side>:<count>'".to_string(),
                    })?;
                let threshold = count.trim().parse::<u32>().map_err(|e| {
                    WagerError::InvalidBetValue {
                        value: value.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(BetSelection::CaptureThreshold {
                    side: parse_side(side)?,
                    threshold,
                })
            }
            BetType::FirstMill => Ok(BetSelection::FirstMill {
                side: parse_side(value)?,
            }),
            BetType::PerfectGame => Ok(BetSelection::PerfectGame {
                side: parse_side(value)?,
            }),
        }
    }

    /// The bet type this selection belongs to.
    #[must_use]
    pub fn bet_type(&self) -> BetType {
        match self {
            BetSelection::Winner { .. } => BetType::Winner,
            BetSelection::CaptureThreshold { .. } => BetType::CaptureThreshold,
            BetSelection::FirstMill { .. } => BetType::FirstMill,
            BetSelection::PerfectGame { .. } => BetType::PerfectGame,
        }
    }

    /// The side the bet backs; `None` for a draw.
    #[must_use]
    pub fn backed_side(&self) -> Option<Side> {
        match *self {
            BetSelection::Winner { side } => side,
            BetSelection::CaptureThreshold { side, .. }
            | BetSelection::FirstMill { side }
            | BetSelection::PerfectGame { side } => Some(side),
        }
    }

    /// Whether the bet wins against a finished game.
    ///
    /// Unfinished games win nothing.
    #[must_use]
    pub fn is_won(&self, state: &GameState) -> bool {
        let Some(result) = state.result() else {
            return false;
        };
        match *self {
            BetSelection::Winner { side: None } => result == GameResult::Draw,
            BetSelection::Winner { side: Some(side) } => result.is_winner(side),
            BetSelection::CaptureThreshold { side, threshold } => {
                state.captured_by(side) >= threshold
            }
            BetSelection::FirstMill { side } => state.first_mill() == Some(side),
            BetSelection::PerfectGame { side } => {
                result == GameResult::Winner(side) && state.captured_by(side.opponent()) == 0
            }
        }
    }
}

/// A placed bet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub id: BetId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub bet_type: BetType,
    /// The value as submitted.
    pub bet_value: String,
    pub selection: BetSelection,
    pub stake: u64,
    /// Effective odds, rounded to two decimals.
    pub odds: f64,
    /// `floor(stake * odds)`, credited if the bet wins.
    pub potential_win: u64,
    pub status: BetStatus,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl BetRecord {
    /// True until settled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == BetStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, Variant};
    use crate::games::Game;
    use crate::rules::engine::RulesEngine;

    #[test]
    fn test_parse_selections() {
        assert_eq!(
            BetSelection::parse(BetType::Winner, "draw").unwrap(),
            BetSelection::Winner { side: None }
        );
        assert_eq!(
            BetSelection::parse(BetType::Winner, "second").unwrap(),
            BetSelection::Winner {
                side: Some(Side::Second)
            }
        );
        assert_eq!(
            BetSelection::parse(BetType::CaptureThreshold, "first:12").unwrap(),
            BetSelection::CaptureThreshold {
                side: Side::First,
                threshold: 12
            }
        );
        assert!(BetSelection::parse(BetType::CaptureThreshold, "first").is_err());
        assert!(BetSelection::parse(BetType::CaptureThreshold, "first:x").is_err());
        assert!(BetSelection::parse(BetType::FirstMill, "white").is_err());
    }

    #[test]
    fn test_bet_type_from_str() {
        assert_eq!("perfect_game".parse::<BetType>().unwrap(), BetType::PerfectGame);
        assert!("jackpot".parse::<BetType>().is_err());
    }

    #[test]
    fn test_unfinished_game_wins_nothing() {
        let game = Game::new(&GameConfig::default_for(Variant::Sowing));
        let state = game.initial_state();
        let draw = BetSelection::Winner { side: None };
        assert!(!draw.is_won(&state));
    }

    #[test]
    fn test_forfeit_is_not_perfect() {
        let game = Game::new(&GameConfig::default_for(Variant::Draughts));
        let state = game.forfeit(&game.initial_state(), Side::Second).unwrap();
        let winner = BetSelection::Winner {
            side: Some(Side::First),
        };
        let perfect = BetSelection::PerfectGame { side: Side::First };
        assert!(winner.is_won(&state));
        assert!(!perfect.is_won(&state));
    }
}
