//! Game configuration types.
//!
//! Each variant is configured by a small serde struct with builder-style
//! setters. `GameConfig` is the tagged union handed to `Game::new`.
//!
//! ```
//! use boardstake::core::{GameConfig, SowingConfig, SowingStyle, Variant};
//!
//! let config = GameConfig::Sowing(SowingConfig::default().with_style(SowingStyle::Kalah));
//! assert_eq!(config.variant(), Variant::Sowing);
//! ```

use serde::{Deserialize, Serialize};

/// Game variant identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Seed-sowing game (Oware/Kalah family).
    Sowing,
    /// 8x8 draughts.
    Draughts,
    /// Nine men's morris style mill game.
    Mill,
}

impl Variant {
    /// All variants.
    pub const ALL: [Variant; 3] = [Variant::Sowing, Variant::Draughts, Variant::Mill];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Sowing => "sowing",
            Variant::Draughts => "draughts",
            Variant::Mill => "mill",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown variant '{s}'"))
    }
}

/// Sowing rule family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SowingStyle {
    /// Skips the opponent's store, captures 2s and 3s in the opponent's row.
    Oware,
    /// Sows every slot, captures opposite pits, extra turn on own store.
    Kalah,
}

impl SowingStyle {
    /// Whether sowing passes over the opponent's store.
    #[must_use]
    pub const fn skips_opponent_store(self) -> bool {
        matches!(self, SowingStyle::Oware)
    }
}

impl std::str::FromStr for SowingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oware" => Ok(SowingStyle::Oware),
            "kalah" => Ok(SowingStyle::Kalah),
            other => Err(format!("unknown sowing style '{other}'")),
        }
    }
}

/// Sowing game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SowingConfig {
    /// Rule family.
    pub style: SowingStyle,

    /// Seeds placed in every pit at the start.
    pub seeds_per_pit: u16,
}

impl Default for SowingConfig {
    fn default() -> Self {
        Self {
            style: SowingStyle::Oware,
            seeds_per_pit: 4,
        }
    }
}

impl SowingConfig {
    /// Largest starting count whose twelve pits still fit a `u16` store.
    pub const MAX_SEEDS_PER_PIT: u16 = u16::MAX / 12;

    /// Set the rule family.
    #[must_use]
    pub fn with_style(mut self, style: SowingStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the starting seeds per pit.
    #[must_use]
    pub fn with_seeds_per_pit(mut self, seeds: u16) -> Self {
        self.seeds_per_pit = seeds;
        self
    }
}

/// Draughts configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraughtsConfig {
    /// When true, simple moves are illegal while any jump exists.
    pub forced_capture: bool,

    /// Consecutive capture-free plies before the game is drawn (0 = never).
    pub quiet_move_limit: u16,
}

impl Default for DraughtsConfig {
    fn default() -> Self {
        Self {
            forced_capture: false,
            quiet_move_limit: 80,
        }
    }
}

impl DraughtsConfig {
    /// Enable or disable mandatory capture.
    #[must_use]
    pub fn with_forced_capture(mut self, forced: bool) -> Self {
        self.forced_capture = forced;
        self
    }

    /// Set the capture-free draw limit.
    #[must_use]
    pub fn with_quiet_move_limit(mut self, limit: u16) -> Self {
        self.quiet_move_limit = limit;
        self
    }
}

/// Mill game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MillConfig {
    /// Pieces each side places during the placement phase.
    pub pieces_per_side: u8,

    /// A side with at most this many pieces on the board may fly.
    pub flying_threshold: u8,

    /// Consecutive capture-free plies after placement before a draw (0 = never).
    pub quiet_move_limit: u16,
}

impl Default for MillConfig {
    fn default() -> Self {
        Self {
            pieces_per_side: 9,
            flying_threshold: 3,
            quiet_move_limit: 100,
        }
    }
}

impl MillConfig {
    /// Fewest pieces that can still form a mill.
    pub const MIN_PIECES_PER_SIDE: u8 = 3;
    /// Both sides must fit on the 24 points.
    pub const MAX_PIECES_PER_SIDE: u8 = 12;

    /// Set the number of pieces per side.
    #[must_use]
    pub fn with_pieces_per_side(mut self, pieces: u8) -> Self {
        self.pieces_per_side = pieces;
        self
    }

    /// Set the flying threshold.
    #[must_use]
    pub fn with_flying_threshold(mut self, threshold: u8) -> Self {
        self.flying_threshold = threshold;
        self
    }

    /// Set the capture-free draw limit.
    #[must_use]
    pub fn with_quiet_move_limit(mut self, limit: u16) -> Self {
        self.quiet_move_limit = limit;
        self
    }
}

/// Configuration for one game, tagged by variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum GameConfig {
    /// Sowing game.
    Sowing(SowingConfig),
    /// Draughts.
    Draughts(DraughtsConfig),
    /// Mill game.
    Mill(MillConfig),
}

impl GameConfig {
    /// Default configuration for a variant.
    #[must_use]
    pub fn default_for(variant: Variant) -> Self {
        match variant {
            Variant::Sowing => GameConfig::Sowing(SowingConfig::default()),
            Variant::Draughts => GameConfig::Draughts(DraughtsConfig::default()),
            Variant::Mill => GameConfig::Mill(MillConfig::default()),
        }
    }

    /// The variant this configuration describes.
    #[must_use]
    pub fn variant(&self) -> Variant {
        match self {
            GameConfig::Sowing(_) => Variant::Sowing,
            GameConfig::Draughts(_) => Variant::Draughts,
            GameConfig::Mill(_) => Variant::Mill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let sowing = SowingConfig::default();
        assert_eq!(sowing.style, SowingStyle::Oware);
        assert_eq!(sowing.seeds_per_pit, 4);

        let draughts = DraughtsConfig::default();
        assert!(!draughts.forced_capture);

        let mill = MillConfig::default();
        assert_eq!(mill.pieces_per_side, 9);
        assert_eq!(mill.flying_threshold, 3);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MillConfig::default()
            .with_pieces_per_side(6)
            .with_flying_threshold(0)
            .with_quiet_move_limit(10);

        assert_eq!(config.pieces_per_side, 6);
        assert_eq!(config.flying_threshold, 0);
        assert_eq!(config.quiet_move_limit, 10);
    }

    #[test]
    fn test_style_store_skipping() {
        assert!(SowingStyle::Oware.skips_opponent_store());
        assert!(!SowingStyle::Kalah.skips_opponent_store());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Mill".parse::<Variant>().unwrap(), Variant::Mill);
        assert_eq!("kalah".parse::<SowingStyle>().unwrap(), SowingStyle::Kalah);
        assert!("chess".parse::<Variant>().is_err());
    }

    #[test]
    fn test_game_config_variant() {
        for variant in Variant::ALL {
            assert_eq!(GameConfig::default_for(variant).variant(), variant);
        }
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::Sowing(SowingConfig::default().with_style(SowingStyle::Kalah));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"variant\":\"sowing\""));
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
