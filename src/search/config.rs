//! Search configuration: difficulty tiers and their depths.

use serde::{Deserialize, Serialize};

/// AI difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Shallowest search.
    Easy,
    /// Default tier.
    Medium,
    /// Deeper search.
    Hard,
    /// Deepest search.
    Expert,
}

impl Difficulty {
    /// All tiers from shallow to deep.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown difficulty '{s}'"))
    }
}

/// Search depth (plies) per difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyDepths {
    pub easy: u8,
    pub medium: u8,
    pub hard: u8,
    pub expert: u8,
}

impl Default for DifficultyDepths {
    fn default() -> Self {
        Self {
            easy: 1,
            medium: 2,
            hard: 4,
            expert: 6,
        }
    }
}

impl DifficultyDepths {
    /// Depth for a tier.
    #[must_use]
    pub fn depth(&self, difficulty: Difficulty) -> u8 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Expert => self.expert,
        }
    }
}

/// Search configuration parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Depth for each difficulty tier.
    pub depths: DifficultyDepths,
}

impl SearchConfig {
    /// Replace the depth table.
    #[must_use]
    pub fn with_depths(mut self, depths: DifficultyDepths) -> Self {
        self.depths = depths;
        self
    }

    /// Depth for a tier (never below 1).
    #[must_use]
    pub fn depth_for(&self, difficulty: Difficulty) -> u8 {
        self.depths.depth(difficulty).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depths_increase() {
        let config = SearchConfig::default();
        let depths: Vec<u8> = Difficulty::ALL
            .iter()
            .map(|&d| config.depth_for(d))
            .collect();
        assert_eq!(depths, vec![1, 2, 4, 6]);
        assert!(depths.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_depth_never_zero() {
        let config = SearchConfig::default().with_depths(DifficultyDepths {
            easy: 0,
            ..DifficultyDepths::default()
        });
        assert_eq!(config.depth_for(Difficulty::Easy), 1);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
