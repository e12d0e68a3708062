//! TOML settings: rule variants, search depths and odds.
//!
//! Every section is optional; missing sections and keys fall back to the
//! defaults.
//!
//! ```toml
//! [sowing]
//! style = "kalah"
//!
//! [search.depths]
//! expert = 8
//!
//! [odds]
//! min_stake = 50
//! ```

use std::path::Path;

use derive_more::{Display, Error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::core::{DraughtsConfig, GameConfig, MillConfig, SowingConfig, Variant};
use crate::search::SearchConfig;
use crate::wager::OddsTable;

/// Settings error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Settings error: {} at {}:{}", message, file, line)]
pub struct SettingsError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl SettingsError {
    /// Creates a new settings error with caller location tracking.
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

/// Everything configurable, in one file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sowing: SowingConfig,
    pub draughts: DraughtsConfig,
    pub mill: MillConfig,
    pub search: SearchConfig,
    pub odds: OddsTable,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = parse(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let settings: Self = load(path.as_ref())?;
        settings.validate()?;
        info!(
            sowing = ?settings.sowing.style,
            base_odds = settings.odds.base.len(),
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Reject values the engines cannot play.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let seeds = self.sowing.seeds_per_pit;
        if seeds == 0 || seeds > SowingConfig::MAX_SEEDS_PER_PIT {
            return Err(SettingsError::new(format!(
                "sowing.seeds_per_pit must be in 1..={}, got {seeds}",
                SowingConfig::MAX_SEEDS_PER_PIT
            )));
        }

        let pieces = self.mill.pieces_per_side;
        if !(MillConfig::MIN_PIECES_PER_SIDE..=MillConfig::MAX_PIECES_PER_SIDE).contains(&pieces) {
            return Err(SettingsError::new(format!(
                "mill.pieces_per_side must be in {}..={}, got {pieces}",
                MillConfig::MIN_PIECES_PER_SIDE,
                MillConfig::MAX_PIECES_PER_SIDE
            )));
        }

        if self.odds.min_stake > self.odds.max_stake {
            return Err(SettingsError::new(format!(
                "odds.min_stake {} exceeds odds.max_stake {}",
                self.odds.min_stake, self.odds.max_stake
            )));
        }
        Ok(())
    }

    /// Game configuration for a variant.
    #[must_use]
    pub fn game_config(&self, variant: Variant) -> GameConfig {
        match variant {
            Variant::Sowing => GameConfig::Sowing(self.sowing.clone()),
            Variant::Draughts => GameConfig::Draughts(self.draughts.clone()),
            Variant::Mill => GameConfig::Mill(self.mill.clone()),
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string(self)
            .map_err(|e| SettingsError::new(format!("Failed to serialize settings: {e}")))
    }
}

/// Load a standalone odds table (see `config/odds.toml`).
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_odds(path: impl AsRef<Path>) -> Result<OddsTable, SettingsError> {
    let odds: OddsTable = load(path.as_ref())?;
    info!(base_odds = odds.base.len(), "Odds table loaded");
    Ok(odds)
}

#[track_caller]
fn parse<T: DeserializeOwned>(text: &str) -> Result<T, SettingsError> {
    toml::from_str(text).map_err(|e| SettingsError::new(format!("Failed to parse TOML: {e}")))
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, SettingsError> {
    debug!("Reading settings file");
    let text = std::fs::read_to_string(path).map_err(|e| {
        SettingsError::new(format!("Failed to read {}: {e}", path.display()))
    })?;
    parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SowingStyle;
    use crate::search::Difficulty;
    use crate::wager::BetType;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_sections() {
        let settings = Settings::from_toml_str(
            r#"
            [sowing]
            style = "kalah"

            [search.depths]
            expert = 8

            [odds]
            min_stake = 50

            [[odds.base]]
            variant = "sowing"
            bet_type = "winner"
            odds = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(settings.sowing.style, SowingStyle::Kalah);
        assert_eq!(settings.sowing.seeds_per_pit, 4);
        assert_eq!(settings.search.depth_for(Difficulty::Expert), 8);
        assert_eq!(settings.search.depth_for(Difficulty::Easy), 1);
        assert_eq!(settings.odds.min_stake, 50);
        assert_eq!(settings.odds.base.len(), 1);
        assert_eq!(settings.odds.base_odds(Variant::Sowing, BetType::Winner), Some(2.5));
    }

    #[test]
    fn test_round_trip() {
        let settings = Settings::default();
        let text = settings.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_errors() {
        let err = Settings::from_toml_str("[sowing]\nstyle = \"bao\"").unwrap_err();
        assert!(err.message.starts_with("Failed to parse TOML"));
        assert!(Settings::from_file("/nonexistent/settings.toml").is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let err = Settings::from_toml_str("[sowing]\nseeds_per_pit = 5462").unwrap_err();
        assert!(err.message.contains("seeds_per_pit"), "{err}");
        assert!(Settings::from_toml_str("[sowing]\nseeds_per_pit = 0").is_err());
        assert!(Settings::from_toml_str("[sowing]\nseeds_per_pit = 5461").is_ok());

        let err = Settings::from_toml_str("[mill]\npieces_per_side = 13").unwrap_err();
        assert!(err.message.contains("pieces_per_side"), "{err}");
        assert!(Settings::from_toml_str("[mill]\npieces_per_side = 2").is_err());
        assert!(Settings::from_toml_str("[mill]\npieces_per_side = 12").is_ok());

        assert!(Settings::from_toml_str("[odds]\nmin_stake = 500\nmax_stake = 100").is_err());
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_shipped_odds_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/odds.toml");
        let odds = load_odds(path).unwrap();
        assert_eq!(odds, OddsTable::default());
    }
}
